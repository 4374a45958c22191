//! Validation and identity errors shared by every crate.
//!
//! Store-level errors (`DatabaseError`) live in `mdip-db`; import errors live
//! next to the loader. Everything converges into `anyhow` in the binary.

use thiserror::Error;

use crate::enums::EntityKind;

/// A single field violated a declared rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {rule}")]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

impl ValidationError {
    #[must_use]
    pub const fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

/// The rule a field failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rule {
    #[error("must not be empty")]
    Required,

    #[error("must be at least {0} characters")]
    MinLength(usize),

    #[error("may only contain {0}")]
    Charset(&'static str),

    #[error("'{value}' is not one of {allowed:?}")]
    NotAMember {
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("must be zero or greater")]
    NonNegative,

    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),

    #[error("'{0}' is not a finite number")]
    NotANumber(String),

    #[error("'{0}' is not a recognised date or timestamp")]
    NotADate(String),

    #[error("must be {0}")]
    Format(&'static str),

    #[error("{0}")]
    Requires(&'static str),
}

/// Raw value that is not a label of the target enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not one of {allowed:?}")]
pub struct UnknownMember {
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl UnknownMember {
    /// Attach the field name this value was supplied for.
    #[must_use]
    pub fn for_field(self, field: &'static str) -> ValidationError {
        ValidationError::new(
            field,
            Rule::NotAMember {
                value: self.value,
                allowed: self.allowed,
            },
        )
    }
}

/// Errors raised by entity construction and identity assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The entity already carries a store-assigned identifier.
    #[error("{entity} already persisted with id {id}")]
    AlreadyPersisted { entity: EntityKind, id: i64 },
}
