//! Shared test utilities for mdip-db unit tests.
//!
//! Each test gets its own database file: separate connections to `:memory:`
//! would each see an empty database.

use chrono::{TimeZone, Utc};
use mdip_core::entities::{
    Dataset, ItTicket, NewDataset, NewIncident, NewTicket, NewUser, SecurityIncident, User,
};
use mdip_core::enums::{IncidentStatus, Severity, TicketPriority, TicketStatus, UserRole};
use tempfile::TempDir;

use crate::Store;

/// Open a fresh store in a temp dir. Keep the `TempDir` alive for the test.
pub async fn test_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mdip.db");
    let store = Store::open_local(path.to_str().unwrap()).await.unwrap();
    (dir, store)
}

pub fn incident(title: &str, severity: Severity) -> SecurityIncident {
    SecurityIncident::new(NewIncident {
        title: title.into(),
        description: Some(format!("{title} details")),
        severity,
        category: "Phishing".into(),
        status: IncidentStatus::Open,
        timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
        reported_by: None,
        source_id: None,
    })
    .unwrap()
}

pub fn dataset(name: &str, rows: i64) -> Dataset {
    Dataset::new(NewDataset {
        name: name.into(),
        rows,
        columns: 8,
        uploaded_by: Some("data_team".into()),
        owner_id: None,
        upload_date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        source_id: None,
    })
    .unwrap()
}

pub fn ticket(description: &str, priority: TicketPriority) -> ItTicket {
    ItTicket::new(NewTicket {
        priority,
        description: description.into(),
        status: TicketStatus::Open,
        assigned_to: None,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        resolution_time_hours: None,
        opened_by: None,
        source_id: None,
    })
    .unwrap()
}

pub fn user(username: &str) -> User {
    User::new(NewUser {
        username: username.into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        role: UserRole::User,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    })
    .unwrap()
}
