//! End-to-end: CSV file on disk → loader → repositories → store file.

use mdip_core::entities::IncidentDraft;
use mdip_core::enums::{EntityKind, Severity};
use mdip_db::Store;
use mdip_db::import::{ImportPlan, import_all, load_file};
use mdip_db::repos::{IncidentFilter, IncidentRepo, Repository};
use pretty_assertions::assert_eq;

const INCIDENTS: &str = "\
incident_id,timestamp,severity,category,status,description
1001,2024-01-01 08:00:00.000000,Critical,Ransomware,Open,File server encrypted
1002,2024-01-01 09:15:00,Medium,Phishing,Resolved,Invoice lure
1003,2024-01-02 10:00:00,Severe,Phishing,Open,Unknown severity label
1004,2024-01-03 11:30:00,Low,Malware,Closed,
1005,2024-01-04 12:45:00,High,DDoS,In Progress,Edge saturated
";

async fn open(dir: &tempfile::TempDir) -> Store {
    Store::open_local(dir.path().join("mdip.db").to_str().unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn good_rows_land_bad_rows_are_counted() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir).await;
    let source = dir.path().join("cyber_incidents.csv");
    std::fs::write(&source, INCIDENTS).unwrap();

    let repo = IncidentRepo::new(&store);
    let before = repo.count().await.unwrap();
    let report = load_file::<IncidentDraft, _>(&repo, &source, false).await.unwrap();

    // Row 3 has an unknown severity; row 4 has neither title nor description.
    assert_eq!(report.attempted, 5);
    assert_eq!(report.succeeded, 3);
    assert_eq!(
        report.failures.iter().map(|f| f.row).collect::<Vec<_>>(),
        [3, 4]
    );
    assert_eq!(repo.count().await.unwrap(), before + 3);

    let critical = repo
        .list(&IncidentFilter {
            severity: Some(Severity::Critical),
            ..IncidentFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(critical.len(), 1);
    assert_eq!(critical[0].source_id(), Some("1001"));
    assert_eq!(critical[0].title(), "File server encrypted");
}

#[tokio::test]
async fn data_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cyber_incidents.csv"), INCIDENTS).unwrap();

    {
        let store = open(&dir).await;
        let outcomes = import_all(
            &store,
            &ImportPlan {
                data_dir: dir.path().to_path_buf(),
                incidents_file: "cyber_incidents.csv".into(),
                datasets_file: "datasets_metadata.csv".into(),
                tickets_file: "it_tickets.csv".into(),
                replace: false,
                only: Some(EntityKind::Incident),
            },
        )
        .await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].result.is_ok());
    }

    let reopened = open(&dir).await;
    assert_eq!(IncidentRepo::new(&reopened).count().await.unwrap(), 3);
}
