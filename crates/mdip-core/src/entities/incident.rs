use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, IncidentStatus, Severity};
use crate::errors::{CoreError, ValidationError};
use crate::validate;

/// A reported security incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityIncident {
    id: Option<i64>,
    title: String,
    description: Option<String>,
    severity: Severity,
    category: String,
    status: IncidentStatus,
    timestamp: DateTime<Utc>,
    reported_by: Option<i64>,
    source_id: Option<String>,
}

/// Parsed incident fields, not yet checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub title: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub category: String,
    pub status: IncidentStatus,
    pub timestamp: DateTime<Utc>,
    pub reported_by: Option<i64>,
    pub source_id: Option<String>,
}

impl SecurityIncident {
    /// Validate and build an unpersisted incident.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn new(fields: NewIncident) -> Result<Self, ValidationError> {
        validate::required("title", &fields.title)?;
        validate::required("category", &fields.category)?;
        let reported_by = fields
            .reported_by
            .map(|id| validate::non_negative("reported_by", id))
            .transpose()?;

        Ok(Self {
            id: None,
            title: fields.title,
            description: validate::optional_text(fields.description),
            severity: fields.severity,
            category: fields.category,
            status: fields.status,
            timestamp: fields.timestamp,
            reported_by,
            source_id: validate::optional_text(fields.source_id),
        })
    }

    /// Attach the identifier assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadyPersisted`] if an id is already set.
    pub fn with_id(mut self, id: i64) -> Result<Self, CoreError> {
        super::assign_id(&mut self.id, EntityKind::Incident, id)?;
        Ok(self)
    }

    /// The fields of this incident, for patching and re-validation.
    #[must_use]
    pub fn to_new(&self) -> NewIncident {
        NewIncident {
            title: self.title.clone(),
            description: self.description.clone(),
            severity: self.severity,
            category: self.category.clone(),
            status: self.status,
            timestamp: self.timestamp,
            reported_by: self.reported_by,
            source_id: self.source_id.clone(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn status(&self) -> IncidentStatus {
        self.status
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub const fn reported_by(&self) -> Option<i64> {
        self.reported_by
    }

    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    #[must_use]
    pub const fn is_critical(&self) -> bool {
        matches!(self.severity, Severity::Critical)
    }

    /// Open or in progress.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_active()
    }
}

/// One incident row as it appears in `cyber_incidents.csv`.
///
/// The source has no title column; when `title` is absent the description
/// doubles as the title.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentDraft {
    #[serde(default)]
    pub incident_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub timestamp: String,
    pub severity: String,
    pub category: String,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reported_by: Option<String>,
}

impl IncidentDraft {
    /// Columns the CSV header must contain.
    pub const CSV_COLUMNS: &'static [&'static str] =
        &["incident_id", "timestamp", "severity", "category", "status", "description"];

    /// Parse and validate every field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn validate(self) -> Result<SecurityIncident, ValidationError> {
        let description = validate::optional_text(self.description);
        let title = validate::optional_text(self.title)
            .or_else(|| description.clone())
            .unwrap_or_default();

        SecurityIncident::new(NewIncident {
            title,
            description,
            severity: validate::member("severity", &self.severity)?,
            category: self.category,
            status: validate::member("status", &self.status)?,
            timestamp: validate::parse_timestamp("timestamp", &self.timestamp)?,
            reported_by: validate::parse_optional_ref("reported_by", self.reported_by.as_deref())?,
            source_id: self.incident_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Rule;
    use pretty_assertions::assert_eq;

    fn draft() -> IncidentDraft {
        IncidentDraft {
            incident_id: Some("INC-1001".into()),
            title: None,
            timestamp: "2024-01-15 09:30:00".into(),
            severity: "High".into(),
            category: "Phishing".into(),
            status: "Open".into(),
            description: Some("Credential harvesting email".into()),
            reported_by: None,
        }
    }

    #[test]
    fn title_falls_back_to_description() {
        let incident = draft().validate().unwrap();
        assert_eq!(incident.title(), "Credential harvesting email");
        assert_eq!(incident.source_id(), Some("INC-1001"));
        assert_eq!(incident.id(), None);
    }

    #[test]
    fn lowercase_severity_is_rejected() {
        let err = IncidentDraft {
            severity: "high".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "severity");
        assert!(matches!(err.rule, Rule::NotAMember { .. }));
    }

    #[test]
    fn missing_title_and_description_is_rejected() {
        let err = IncidentDraft {
            description: Some("  ".into()),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::new("title", Rule::Required));
    }

    #[test]
    fn id_is_assigned_once() {
        let incident = draft().validate().unwrap().with_id(7).unwrap();
        assert_eq!(incident.id(), Some(7));
        let err = incident.with_id(8).unwrap_err();
        assert_eq!(
            err,
            CoreError::AlreadyPersisted {
                entity: EntityKind::Incident,
                id: 7
            }
        );
    }

    #[test]
    fn derived_queries() {
        let incident = IncidentDraft {
            severity: "Critical".into(),
            status: "In Progress".into(),
            ..draft()
        }
        .validate()
        .unwrap();
        assert!(incident.is_critical());
        assert!(incident.is_open());
    }
}
