//! Patch builders for entity updates.
//!
//! Each builder produces a patch struct with `Option` fields. `None` leaves
//! the stored value alone; `Some` replaces it. For nullable columns the
//! inner `Option` distinguishes "clear" (`Some(None)`) from "untouched".
//! A patch is merged into the entity's current fields and the result goes
//! back through the entity constructor before anything is written.

pub mod dataset;
pub mod incident;
pub mod ticket;
pub mod user;
