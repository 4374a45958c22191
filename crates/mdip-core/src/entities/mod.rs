//! Entity records for the four persisted kinds.
//!
//! Each kind comes in three shapes:
//! - the record itself (`SecurityIncident`, ...), whose fields are private and
//!   which only exists once every rule has passed;
//! - a typed `New*` value used by callers that already hold parsed values;
//! - a `*Draft` of raw strings, shaped like the CSV source, for ingestion.
//!
//! Identifiers are `None` until the store assigns one through `with_id`.

mod dataset;
mod incident;
mod ticket;
mod user;

pub use dataset::{Dataset, DatasetDraft, NewDataset};
pub use incident::{IncidentDraft, NewIncident, SecurityIncident};
pub use ticket::{ItTicket, NewTicket, TicketDraft};
pub use user::{NewUser, User, validate_username};

use crate::enums::EntityKind;
use crate::errors::CoreError;

/// Set a store-assigned identifier exactly once.
fn assign_id(slot: &mut Option<i64>, entity: EntityKind, id: i64) -> Result<(), CoreError> {
    if let Some(existing) = *slot {
        return Err(CoreError::AlreadyPersisted {
            entity,
            id: existing,
        });
    }
    *slot = Some(id);
    Ok(())
}
