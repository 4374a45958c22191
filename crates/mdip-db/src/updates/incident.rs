//! Incident patch builder.

use chrono::{DateTime, Utc};
use mdip_core::entities::NewIncident;
use mdip_core::enums::{IncidentStatus, Severity};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub severity: Option<Severity>,
    pub category: Option<String>,
    pub status: Option<IncidentStatus>,
    pub timestamp: Option<DateTime<Utc>>,
    pub reported_by: Option<Option<i64>>,
}

impl IncidentPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the patched fields onto `base`.
    #[must_use]
    pub fn apply(self, mut base: NewIncident) -> NewIncident {
        if let Some(title) = self.title {
            base.title = title;
        }
        if let Some(description) = self.description {
            base.description = description;
        }
        if let Some(severity) = self.severity {
            base.severity = severity;
        }
        if let Some(category) = self.category {
            base.category = category;
        }
        if let Some(status) = self.status {
            base.status = status;
        }
        if let Some(timestamp) = self.timestamp {
            base.timestamp = timestamp;
        }
        if let Some(reported_by) = self.reported_by {
            base.reported_by = reported_by;
        }
        base
    }
}

#[derive(Default)]
pub struct IncidentPatchBuilder(IncidentPatch);

impl IncidentPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn severity(mut self, severity: Severity) -> Self {
        self.0.severity = Some(severity);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.0.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: IncidentStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.0.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub const fn reported_by(mut self, reported_by: Option<i64>) -> Self {
        self.0.reported_by = Some(reported_by);
        self
    }

    #[must_use]
    pub fn build(self) -> IncidentPatch {
        self.0
    }
}
