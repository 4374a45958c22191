use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, TicketPriority, TicketStatus};
use crate::errors::{CoreError, Rule, ValidationError};
use crate::validate;

/// An IT support ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItTicket {
    id: Option<i64>,
    priority: TicketPriority,
    description: String,
    status: TicketStatus,
    assigned_to: Option<String>,
    created_at: DateTime<Utc>,
    resolution_time_hours: Option<f64>,
    opened_by: Option<i64>,
    source_id: Option<String>,
}

/// Parsed ticket fields, not yet checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub priority: TicketPriority,
    pub description: String,
    pub status: TicketStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolution_time_hours: Option<f64>,
    pub opened_by: Option<i64>,
    pub source_id: Option<String>,
}

impl ItTicket {
    /// Validate and build an unpersisted ticket.
    ///
    /// A resolution time is only accepted on Resolved or Closed tickets.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn new(fields: NewTicket) -> Result<Self, ValidationError> {
        validate::required("description", &fields.description)?;
        let resolution_time_hours = fields
            .resolution_time_hours
            .map(|h| validate::non_negative_number("resolution_time_hours", h))
            .transpose()?;
        if resolution_time_hours.is_some() && !fields.status.is_resolved() {
            return Err(ValidationError::new(
                "resolution_time_hours",
                Rule::Requires("only allowed once the ticket is Resolved or Closed"),
            ));
        }
        let opened_by = fields
            .opened_by
            .map(|id| validate::non_negative("opened_by", id))
            .transpose()?;

        Ok(Self {
            id: None,
            priority: fields.priority,
            description: fields.description,
            status: fields.status,
            assigned_to: validate::optional_text(fields.assigned_to),
            created_at: fields.created_at,
            resolution_time_hours,
            opened_by,
            source_id: validate::optional_text(fields.source_id),
        })
    }

    /// Attach the identifier assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadyPersisted`] if an id is already set.
    pub fn with_id(mut self, id: i64) -> Result<Self, CoreError> {
        super::assign_id(&mut self.id, EntityKind::Ticket, id)?;
        Ok(self)
    }

    #[must_use]
    pub fn to_new(&self) -> NewTicket {
        NewTicket {
            priority: self.priority,
            description: self.description.clone(),
            status: self.status,
            assigned_to: self.assigned_to.clone(),
            created_at: self.created_at,
            resolution_time_hours: self.resolution_time_hours,
            opened_by: self.opened_by,
            source_id: self.source_id.clone(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub const fn priority(&self) -> TicketPriority {
        self.priority
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn resolution_time_hours(&self) -> Option<f64> {
        self.resolution_time_hours
    }

    #[must_use]
    pub const fn opened_by(&self) -> Option<i64> {
        self.opened_by
    }

    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.status.is_resolved()
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    #[must_use]
    pub const fn sla_hours(&self) -> u32 {
        self.priority.sla_hours()
    }

    #[must_use]
    pub const fn priority_weight(&self) -> u8 {
        self.priority.weight()
    }

    /// Hours elapsed between creation and `now`. Negative if `now` is earlier.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_seconds() as f64 / 3600.0
    }

    /// Still open and older than its priority's SLA.
    #[must_use]
    pub fn is_sla_breached(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.age_hours(now) > f64::from(self.sla_hours())
    }
}

/// One ticket row as it appears in `it_tickets.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketDraft {
    #[serde(default)]
    pub ticket_id: Option<String>,
    pub priority: String,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub resolution_time_hours: Option<String>,
    #[serde(default)]
    pub opened_by: Option<String>,
}

impl TicketDraft {
    pub const CSV_COLUMNS: &'static [&'static str] = &[
        "ticket_id",
        "priority",
        "description",
        "status",
        "assigned_to",
        "created_at",
        "resolution_time_hours",
    ];

    /// Parse and validate every field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn validate(self) -> Result<ItTicket, ValidationError> {
        ItTicket::new(NewTicket {
            priority: validate::member("priority", &self.priority)?,
            description: self.description,
            status: validate::member("status", &self.status)?,
            assigned_to: self.assigned_to,
            created_at: validate::parse_timestamp("created_at", &self.created_at)?,
            resolution_time_hours: validate::parse_optional_hours(
                "resolution_time_hours",
                self.resolution_time_hours.as_deref(),
            )?,
            opened_by: validate::parse_optional_ref("opened_by", self.opened_by.as_deref())?,
            source_id: self.ticket_id,
        })
    }
}
