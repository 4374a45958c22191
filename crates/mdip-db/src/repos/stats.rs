//! Dashboard aggregates computed in SQL.

use chrono::{DateTime, Utc};
use mdip_core::entities::Dataset;
use mdip_core::enums::{Enumerated, IncidentStatus, Severity, TicketPriority, TicketStatus};
use serde::Serialize;

use super::{DatasetRepo, Repository, TicketFilter, TicketRepo};
use crate::Store;
use crate::error::DatabaseError;
use crate::helpers::{parse_label, to_count};

/// Incident totals by severity and status. Every member appears, zero or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentStats {
    pub total: u64,
    pub by_severity: Vec<(Severity, u64)>,
    pub by_status: Vec<(IncidentStatus, u64)>,
    pub open: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketStats {
    pub total: u64,
    pub by_status: Vec<(TicketStatus, u64)>,
    pub by_priority: Vec<(TicketPriority, u64)>,
    /// Open tickets older than their priority's SLA.
    pub sla_breached: u64,
    pub avg_resolution_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub count: u64,
    pub total_rows: i64,
    pub largest: Option<Dataset>,
}

/// Count rows grouped by an enumeration column, filling in absent members.
async fn grouped<E: Enumerated + PartialEq>(
    store: &Store,
    table: &str,
    column: &str,
) -> Result<Vec<(E, u64)>, DatabaseError> {
    let conn = store.connection()?;
    let mut rows = conn
        .query_with(
            &format!("SELECT {column}, count(*) FROM {table} GROUP BY {column}"),
            Vec::new(),
        )
        .await?;

    let mut counts: Vec<(E, u64)> = E::ALL.iter().map(|m| (*m, 0)).collect();
    while let Some(row) = rows.next().await? {
        let member: E = parse_label(column, &row.get::<String>(0)?)?;
        let n = to_count(row.get::<i64>(1)?)?;
        if let Some(slot) = counts.iter_mut().find(|(m, _)| *m == member) {
            slot.1 = n;
        }
    }
    Ok(counts)
}

/// # Errors
///
/// Store failures only.
pub async fn incident_stats(store: &Store) -> Result<IncidentStats, DatabaseError> {
    let by_severity = grouped::<Severity>(store, "incidents", "severity").await?;
    let by_status = grouped::<IncidentStatus>(store, "incidents", "status").await?;
    let total = by_status.iter().map(|(_, n)| n).sum();
    let open = by_status
        .iter()
        .filter(|(s, _)| s.is_active())
        .map(|(_, n)| n)
        .sum();
    Ok(IncidentStats {
        total,
        by_severity,
        by_status,
        open,
    })
}

/// # Errors
///
/// Store failures only.
pub async fn ticket_stats(store: &Store, now: DateTime<Utc>) -> Result<TicketStats, DatabaseError> {
    let by_status = grouped::<TicketStatus>(store, "tickets", "status").await?;
    let by_priority = grouped::<TicketPriority>(store, "tickets", "priority").await?;
    let total = by_status.iter().map(|(_, n)| n).sum();

    let avg_resolution_hours = {
        let conn = store.connection()?;
        let mut rows = conn
            .query_with(
                "SELECT avg(resolution_time_hours) FROM tickets WHERE resolution_time_hours IS NOT NULL",
                Vec::new(),
            )
            .await?;
        match rows.next().await? {
            Some(row) => row.get::<Option<f64>>(0)?,
            None => None,
        }
    };

    let mut sla_breached = 0;
    for ticket in TicketRepo::new(store).list(&TicketFilter::default()).await? {
        if ticket.is_sla_breached(now) {
            sla_breached += 1;
        }
    }

    Ok(TicketStats {
        total,
        by_status,
        by_priority,
        sla_breached,
        avg_resolution_hours,
    })
}

/// # Errors
///
/// Store failures only.
pub async fn dataset_stats(store: &Store) -> Result<DatasetStats, DatabaseError> {
    let repo = DatasetRepo::new(store);
    let count = repo.count().await?;

    let conn = store.connection()?;
    let total_rows = conn
        .query_scalar("SELECT coalesce(sum(row_count), 0) FROM datasets", Vec::new())
        .await?;
    let largest_id = {
        let mut rows = conn
            .query_with(
                "SELECT id FROM datasets ORDER BY row_count DESC, id ASC LIMIT 1",
                Vec::new(),
            )
            .await?;
        match rows.next().await? {
            Some(row) => Some(row.get::<i64>(0)?),
            None => None,
        }
    };
    drop(conn);

    let largest = match largest_id {
        Some(id) => Some(repo.get(id).await?),
        None => None,
    };
    Ok(DatasetStats {
        count,
        total_rows,
        largest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::IncidentRepo;
    use crate::test_support::{dataset, incident, test_store, ticket};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn incident_counts_include_zero_members() {
        let (_dir, store) = test_store().await;
        let repo = IncidentRepo::new(&store);
        repo.create(&incident("a", Severity::High)).await.unwrap();
        repo.create(&incident("b", Severity::High)).await.unwrap();
        repo.create(&incident("c", Severity::Low)).await.unwrap();

        let stats = incident_stats(&store).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.open, 3);
        assert_eq!(
            stats.by_severity,
            vec![
                (Severity::Low, 1),
                (Severity::Medium, 0),
                (Severity::High, 2),
                (Severity::Critical, 0),
            ]
        );
    }

    #[tokio::test]
    async fn ticket_stats_count_breaches() {
        let (_dir, store) = test_store().await;
        let repo = TicketRepo::new(&store);
        repo.create(&ticket("a", TicketPriority::Critical)).await.unwrap();
        repo.create(&ticket("b", TicketPriority::Low)).await.unwrap();
        let done = repo.create(&ticket("c", TicketPriority::Critical)).await.unwrap();
        repo.resolve(done, 3.0).await.unwrap();

        // Tickets were created 2024-05-01 08:00; ten hours later only the
        // open Critical one is past its 4h target.
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let stats = ticket_stats(&store, now).await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.sla_breached, 1);
        assert_eq!(stats.avg_resolution_hours, Some(3.0));
    }

    #[tokio::test]
    async fn dataset_totals_and_largest() {
        let (_dir, store) = test_store().await;
        let empty = dataset_stats(&store).await.unwrap();
        assert_eq!(empty.count, 0);
        assert_eq!(empty.total_rows, 0);
        assert!(empty.largest.is_none());

        let repo = DatasetRepo::new(&store);
        repo.create(&dataset("small", 10)).await.unwrap();
        repo.create(&dataset("big", 90)).await.unwrap();
        let stats = dataset_stats(&store).await.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_rows, 100);
        assert_eq!(stats.largest.unwrap().name(), "big");
    }
}
