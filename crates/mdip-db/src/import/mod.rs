//! Bulk CSV loader.
//!
//! Each data row is deserialized by header name, validated into an entity
//! and persisted through its repository. A row that fails either step is
//! recorded with its 1-based data-row index and skipped; the load carries
//! on. Only a missing source, a header without the required columns, or a
//! store failure stops the whole step.
//!
//! Each source loads inside one transaction, together with the `--replace`
//! clear. A store failure part way through rolls the table back to what it
//! held before the step started.
//!
//! Loading is not idempotent: running it twice against the same table
//! inserts every row twice unless the table is cleared first.

mod plan;
mod records;

pub use plan::{ImportOutcome, ImportPlan, import_all};
pub use records::CsvRecord;

use std::io::Read;
use std::path::{Path, PathBuf};

use mdip_core::enums::EntityKind;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::StoreConn;
use crate::error::DatabaseError;
use crate::repos::Repository;

/// Errors that stop an import step.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("source file not found: {}", path.display())]
    SourceMissing { path: PathBuf },

    #[error("{entity} source is missing required column(s): {}", missing.join(", "))]
    MissingColumns {
        entity: EntityKind,
        missing: Vec<String>,
    },

    #[error("could not read CSV source: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// A skipped row and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// Outcome of loading one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub entity: EntityKind,
    pub attempted: usize,
    pub succeeded: usize,
    /// Rows removed by `--replace` before loading.
    pub cleared: u64,
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    const fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            attempted: 0,
            succeeded: 0,
            cleared: 0,
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Header names are trimmed; field values are taken as written.
fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::Headers);
    builder
}

/// Check the header row carries every required column.
fn check_headers<D: CsvRecord>(headers: &csv::StringRecord) -> Result<(), ImportError> {
    let missing: Vec<String> = D::REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns {
            entity: D::KIND,
            missing,
        })
    }
}

/// Load every row of a CSV stream into `repo`.
///
/// # Errors
///
/// `MissingColumns` if the header lacks a required column; `Csv` if the
/// header cannot be read; `Database` if the store fails. Bad rows are not
/// errors: they land in [`ImportReport::failures`].
pub async fn load_reader<D, R, S>(repo: &R, source: S) -> Result<ImportReport, ImportError>
where
    D: CsvRecord,
    R: Repository<Entity = D::Entity>,
    S: Read,
{
    let reader = reader_builder().from_reader(source);
    load_in_transaction::<D, R, S>(repo, reader, false).await
}

/// Load a CSV file into `repo`, optionally clearing the table first.
///
/// The header is checked before anything is cleared, so a malformed source
/// leaves the table untouched. The clear and the inserts share one
/// transaction.
///
/// # Errors
///
/// `SourceMissing` if `path` does not exist, plus everything
/// [`load_reader`] returns.
pub async fn load_file<D, R>(
    repo: &R,
    path: &Path,
    replace: bool,
) -> Result<ImportReport, ImportError>
where
    D: CsvRecord,
    R: Repository<Entity = D::Entity>,
{
    if !path.is_file() {
        return Err(ImportError::SourceMissing {
            path: path.to_path_buf(),
        });
    }
    let reader = reader_builder().from_path(path)?;
    load_in_transaction::<D, R, _>(repo, reader, replace).await
}

async fn load_in_transaction<D, R, S>(
    repo: &R,
    mut reader: csv::Reader<S>,
    replace: bool,
) -> Result<ImportReport, ImportError>
where
    D: CsvRecord,
    R: Repository<Entity = D::Entity>,
    S: Read,
{
    check_headers::<D>(reader.headers()?)?;

    let conn = repo.store().connection()?;
    conn.begin().await?;
    match load_rows::<D, R, S>(repo, &conn, reader, replace).await {
        Ok(report) => {
            conn.commit().await?;
            info!(
                entity = %D::KIND,
                attempted = report.attempted,
                succeeded = report.succeeded,
                failed = report.failed(),
                cleared = report.cleared,
                "import finished"
            );
            Ok(report)
        }
        Err(e) => {
            if let Err(rollback) = conn.rollback().await {
                warn!(entity = %D::KIND, error = %rollback, "rollback failed");
            }
            warn!(entity = %D::KIND, error = %e, "import rolled back");
            Err(e)
        }
    }
}

async fn load_rows<D, R, S>(
    repo: &R,
    conn: &StoreConn<'_>,
    mut reader: csv::Reader<S>,
    replace: bool,
) -> Result<ImportReport, ImportError>
where
    D: CsvRecord,
    R: Repository<Entity = D::Entity>,
    S: Read,
{
    let mut report = ImportReport::new(D::KIND);
    if replace {
        report.cleared = repo.clear_in(conn).await?;
    }

    for (index, record) in reader.deserialize::<D>().enumerate() {
        let row = index + 1;
        report.attempted += 1;

        let entity = match record {
            Ok(draft) => draft.into_entity().map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match entity {
            Ok(entity) => {
                repo.create_in(conn, &entity).await?;
                report.succeeded += 1;
            }
            Err(reason) => {
                warn!(entity = %D::KIND, row, %reason, "skipping row");
                report.failures.push(RowFailure { row, reason });
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::{DatasetFilter, DatasetRepo, IncidentRepo, TicketRepo};
    use crate::test_support::test_store;
    use mdip_core::entities::{Dataset, DatasetDraft, IncidentDraft, TicketDraft};
    use pretty_assertions::assert_eq;

    const DATASETS: &str = "\
dataset_id,name,rows,columns,uploaded_by,upload_date
1,Phishing URLs,1200,8,data_team,2024-01-03
2,Malware hashes,54000,5,secops,2024-01-10
3,Login events,980000,12,data_team,2024-02-01
4,Firewall logs,0,20,netops,2024-02-14
5,Ticket export,350,9,it_admin,2024-03-01
";

    #[tokio::test]
    async fn five_valid_rows_load_in_order() {
        let (_dir, store) = test_store().await;
        let repo = DatasetRepo::new(&store);

        let report = load_reader::<DatasetDraft, _, _>(&repo, DATASETS.as_bytes())
            .await
            .unwrap();
        assert_eq!(report.attempted, 5);
        assert_eq!(report.succeeded, 5);
        assert_eq!(report.failed(), 0);

        let names: Vec<String> = repo
            .list(&DatasetFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|d: &Dataset| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            ["Phishing URLs", "Malware hashes", "Login events", "Firewall logs", "Ticket export"]
        );
    }

    #[tokio::test]
    async fn bad_rows_are_reported_and_skipped() {
        let (_dir, store) = test_store().await;
        let repo = IncidentRepo::new(&store);
        let csv = "\
incident_id,timestamp,severity,category,status,description,extra
1,2024-01-01 10:00:00,High,Phishing,Open,Fake invoice,x
2,2024-01-01 11:00:00,high,Phishing,Open,Lowercase severity,x
3,not a date,Low,Malware,Closed,Bad timestamp,x
4,2024-01-02 09:00:00,Critical,Ransomware,In Progress,Encrypted share,x
";
        let report = load_reader::<IncidentDraft, _, _>(&repo, csv.as_bytes())
            .await
            .unwrap();
        assert_eq!(report.attempted, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(
            report.failures.iter().map(|f| f.row).collect::<Vec<_>>(),
            [2, 3]
        );
        assert!(report.failures[0].reason.contains("severity"));
        assert!(report.failures[1].reason.contains("timestamp"));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn column_order_is_irrelevant() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        let csv = "\
status,created_at,priority,ticket_id,resolution_time_hours,assigned_to,description
Resolved,2024-04-01 08:00:00,Medium,T1,5.5,IT_Support_A,Password reset
Open,2024-04-02 08:00:00,High,T2,,,Laptop will not boot
Open,2024-04-02 09:00:00,Low,T3,2.0,,Open with hours
";
        let report = load_reader::<TicketDraft, _, _>(&repo, csv.as_bytes())
            .await
            .unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 3);

        let first = repo.get(1).await.unwrap();
        assert_eq!(first.resolution_time_hours(), Some(5.5));
        assert_eq!(first.assigned_to(), Some("IT_Support_A"));
        let second = repo.get(2).await.unwrap();
        assert_eq!(second.assigned_to(), None);
    }

    #[tokio::test]
    async fn missing_column_fails_the_step() {
        let (_dir, store) = test_store().await;
        let repo = DatasetRepo::new(&store);
        let csv = "dataset_id,name,rows,uploaded_by,upload_date\n1,x,1,a,2024-01-01\n";
        let err = load_reader::<DatasetDraft, _, _>(&repo, csv.as_bytes())
            .await
            .unwrap_err();
        match err {
            ImportError::MissingColumns { entity, missing } => {
                assert_eq!(entity, EntityKind::Dataset);
                assert_eq!(missing, ["columns"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_file_is_source_missing() {
        let (dir, store) = test_store().await;
        let repo = DatasetRepo::new(&store);
        let err = load_file::<DatasetDraft, _>(&repo, &dir.path().join("nope.csv"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::SourceMissing { .. }));
    }

    #[tokio::test]
    async fn rerun_duplicates_unless_replaced() {
        let (dir, store) = test_store().await;
        let path = dir.path().join("datasets.csv");
        std::fs::write(&path, DATASETS).unwrap();
        let repo = DatasetRepo::new(&store);

        load_file::<DatasetDraft, _>(&repo, &path, false).await.unwrap();
        load_file::<DatasetDraft, _>(&repo, &path, false).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 10);

        let report = load_file::<DatasetDraft, _>(&repo, &path, true).await.unwrap();
        assert_eq!(report.cleared, 10);
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn padded_field_values_are_not_trimmed() {
        let (_dir, store) = test_store().await;
        let repo = IncidentRepo::new(&store);
        let csv = "\
incident_id , timestamp,severity,category,status,description
1,2024-01-01 10:00:00,High,Phishing,Open,Fake invoice
2,2024-01-01 11:00:00,High ,Phishing,Open,Trailing space in severity
";
        let report = load_reader::<IncidentDraft, _, _>(&repo, csv.as_bytes())
            .await
            .unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 2);
        assert!(report.failures[0].reason.contains("severity"));
    }

    #[tokio::test]
    async fn failed_replace_keeps_previous_rows() {
        let (dir, store) = test_store().await;
        let path = dir.path().join("datasets.csv");
        std::fs::write(&path, DATASETS).unwrap();
        let repo = DatasetRepo::new(&store);
        load_file::<DatasetDraft, _>(&repo, &path, false).await.unwrap();

        // Make the third insert of the reload fail after the clear has run.
        store
            .connection()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_login_events BEFORE INSERT ON datasets
                 WHEN NEW.name = 'Login events'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .await
            .unwrap();

        let err = load_file::<DatasetDraft, _>(&repo, &path, true)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Database(_)), "{err:?}");

        let names: Vec<String> = repo
            .list(&DatasetFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|d: &Dataset| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            ["Phishing URLs", "Malware hashes", "Login events", "Firewall logs", "Ticket export"]
        );
    }
}
