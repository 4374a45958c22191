//! CSV row shapes for each importable kind.

use mdip_core::entities::{
    Dataset, DatasetDraft, IncidentDraft, ItTicket, SecurityIncident, TicketDraft,
};
use mdip_core::enums::EntityKind;
use mdip_core::errors::ValidationError;
use serde::de::DeserializeOwned;

/// A CSV row that validates into an entity.
pub trait CsvRecord: DeserializeOwned {
    type Entity;

    const KIND: EntityKind;

    /// Header names that must be present. Order is irrelevant and extra
    /// columns are ignored.
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// # Errors
    ///
    /// Returns the first rule the row breaks.
    fn into_entity(self) -> Result<Self::Entity, ValidationError>;
}

impl CsvRecord for IncidentDraft {
    type Entity = SecurityIncident;

    const KIND: EntityKind = EntityKind::Incident;
    const REQUIRED_COLUMNS: &'static [&'static str] = Self::CSV_COLUMNS;

    fn into_entity(self) -> Result<SecurityIncident, ValidationError> {
        self.validate()
    }
}

impl CsvRecord for DatasetDraft {
    type Entity = Dataset;

    const KIND: EntityKind = EntityKind::Dataset;
    const REQUIRED_COLUMNS: &'static [&'static str] = Self::CSV_COLUMNS;

    fn into_entity(self) -> Result<Dataset, ValidationError> {
        self.validate()
    }
}

impl CsvRecord for TicketDraft {
    type Entity = ItTicket;

    const KIND: EntityKind = EntityKind::Ticket;
    const REQUIRED_COLUMNS: &'static [&'static str] = Self::CSV_COLUMNS;

    fn into_entity(self) -> Result<ItTicket, ValidationError> {
        self.validate()
    }
}
