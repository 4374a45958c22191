//! # mdip-auth
//!
//! Local account handling for mdip: Argon2id password hashing, registration
//! and login against the user table, and first-run seeding from a users
//! text file.
//!
//! Plaintext passwords are only ever held in memory long enough to hash or
//! verify them. They are never logged or stored.

pub mod accounts;
pub mod credentials;
pub mod error;
pub mod password;

pub use accounts::{login, register};
pub use credentials::{SeedReport, seed_from_file};
pub use error::AuthError;
pub use password::{hash_password, verify_password};
