//! Ticket patch builder.

use chrono::{DateTime, Utc};
use mdip_core::entities::NewTicket;
use mdip_core::enums::{TicketPriority, TicketStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub priority: Option<TicketPriority>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub assigned_to: Option<Option<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub resolution_time_hours: Option<Option<f64>>,
    pub opened_by: Option<Option<i64>>,
}

impl TicketPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn apply(self, mut base: NewTicket) -> NewTicket {
        if let Some(priority) = self.priority {
            base.priority = priority;
        }
        if let Some(description) = self.description {
            base.description = description;
        }
        if let Some(status) = self.status {
            base.status = status;
        }
        if let Some(assigned_to) = self.assigned_to {
            base.assigned_to = assigned_to;
        }
        if let Some(created_at) = self.created_at {
            base.created_at = created_at;
        }
        if let Some(hours) = self.resolution_time_hours {
            base.resolution_time_hours = hours;
        }
        if let Some(opened_by) = self.opened_by {
            base.opened_by = opened_by;
        }
        base
    }
}

#[derive(Default)]
pub struct TicketPatchBuilder(TicketPatch);

impl TicketPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn priority(mut self, priority: TicketPriority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TicketStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn assigned_to(mut self, assigned_to: Option<String>) -> Self {
        self.0.assigned_to = Some(assigned_to);
        self
    }

    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.0.created_at = Some(created_at);
        self
    }

    #[must_use]
    pub const fn resolution_time_hours(mut self, hours: Option<f64>) -> Self {
        self.0.resolution_time_hours = Some(hours);
        self
    }

    #[must_use]
    pub const fn opened_by(mut self, opened_by: Option<i64>) -> Self {
        self.0.opened_by = Some(opened_by);
        self
    }

    #[must_use]
    pub fn build(self) -> TicketPatch {
        self.0
    }
}
