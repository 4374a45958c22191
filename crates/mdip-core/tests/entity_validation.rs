//! Entities can only be observed in a valid state.

use chrono::{TimeZone, Utc};
use mdip_core::entities::{
    Dataset, IncidentDraft, ItTicket, NewDataset, NewIncident, NewTicket, SecurityIncident,
    TicketDraft,
};
use mdip_core::enums::{IncidentStatus, Severity, TicketPriority, TicketStatus};
use mdip_core::errors::Rule;
use pretty_assertions::assert_eq;

#[test]
fn incident_severity_must_match_label_exactly() {
    let draft = IncidentDraft {
        incident_id: Some("1".into()),
        timestamp: "2024-01-01 00:00:00".into(),
        severity: "high".into(),
        category: "Malware".into(),
        status: "Open".into(),
        description: Some("Ransomware note found".into()),
        ..IncidentDraft::default()
    };
    let err = draft.validate().unwrap_err();
    assert_eq!(err.field, "severity");
    assert_eq!(
        err.to_string(),
        "invalid severity: 'high' is not one of [\"Low\", \"Medium\", \"High\", \"Critical\"]"
    );
}

#[test]
fn typed_incident_round_trips_through_to_new() {
    let fields = NewIncident {
        title: "Port scan".into(),
        description: None,
        severity: Severity::Low,
        category: "Recon".into(),
        status: IncidentStatus::Closed,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 3, 3, 3, 3).unwrap(),
        reported_by: Some(2),
        source_id: None,
    };
    let incident = SecurityIncident::new(fields.clone()).unwrap();
    assert_eq!(incident.to_new(), fields);
    assert!(!incident.is_open());
}

#[test]
fn blank_optional_text_becomes_absent() {
    let incident = SecurityIncident::new(NewIncident {
        title: "t".into(),
        description: Some("   ".into()),
        severity: Severity::Medium,
        category: "c".into(),
        status: IncidentStatus::Open,
        timestamp: Utc::now(),
        reported_by: None,
        source_id: Some(String::new()),
    })
    .unwrap();
    assert_eq!(incident.description(), None);
    assert_eq!(incident.source_id(), None);
}

#[test]
fn dataset_rows_must_be_whole_numbers() {
    let err = Dataset::new(NewDataset {
        name: "x".into(),
        rows: 3,
        columns: -3,
        uploaded_by: None,
        owner_id: None,
        upload_date: Utc::now(),
        source_id: None,
    })
    .unwrap_err();
    assert_eq!(err.field, "columns");
    assert_eq!(err.rule, Rule::NonNegative);
}

#[test]
fn ticket_priority_rejects_unknown_label() {
    let err = TicketDraft {
        priority: "Urgent".into(),
        description: "printer".into(),
        status: "Open".into(),
        created_at: "2024-01-01".into(),
        ..TicketDraft::default()
    }
    .validate()
    .unwrap_err();
    assert_eq!(err.field, "priority");
}

#[test]
fn ticket_negative_resolution_is_rejected() {
    let err = ItTicket::new(NewTicket {
        priority: TicketPriority::Low,
        description: "d".into(),
        status: TicketStatus::Resolved,
        assigned_to: None,
        created_at: Utc::now(),
        resolution_time_hours: Some(-1.0),
        opened_by: None,
        source_id: None,
    })
    .unwrap_err();
    assert_eq!(err.field, "resolution_time_hours");
    assert_eq!(err.rule, Rule::NonNegative);
}
