//! Database error types for mdip-db.

use mdip_core::enums::EntityKind;
use mdip_core::errors::{CoreError, ValidationError};
use thiserror::Error;

use crate::retry::is_busy_error;

/// Errors from store and repository operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No row with this id exists for the entity kind.
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    /// A unique field already holds this value.
    #[error("{field} '{value}' already exists")]
    Conflict { field: &'static str, value: String },

    /// `create` was given an entity that already carries an id.
    #[error("{entity} already persisted with id {id}")]
    AlreadyPersisted { entity: EntityKind, id: i64 },

    /// The store stayed locked through every retry.
    #[error("store busy after {attempts} attempt(s): {source}")]
    Busy {
        attempts: u32,
        #[source]
        source: libsql::Error,
    },

    /// A patched or stored value failed entity validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid state encountered (e.g., bad data in the store).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(libsql::Error),
}

impl From<libsql::Error> for DatabaseError {
    fn from(e: libsql::Error) -> Self {
        if is_busy_error(&e) {
            Self::Busy {
                attempts: 1,
                source: e,
            }
        } else {
            Self::LibSql(e)
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(v) => Self::Validation(v),
            CoreError::AlreadyPersisted { entity, id } => Self::AlreadyPersisted { entity, id },
        }
    }
}

impl DatabaseError {
    /// Whether retrying later could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
