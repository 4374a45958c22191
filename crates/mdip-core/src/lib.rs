//! # mdip-core
//!
//! Validated entities, closed enumerations and error types for mdip.
//!
//! This crate provides the types shared by every other crate:
//! - Entity records (incidents, datasets, tickets, users) that can only be
//!   built through their validating constructors
//! - Closed enumerations stored by their canonical labels
//! - Field rules used by the constructors
//! - Validation and identity errors

pub mod entities;
pub mod enums;
pub mod errors;
pub mod validate;
