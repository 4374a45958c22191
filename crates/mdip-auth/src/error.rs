use std::path::PathBuf;

use mdip_core::errors::ValidationError;
use mdip_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; the message is the same for both.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password must be at least {min_length} characters long")]
    WeakPassword { min_length: usize },

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("cannot read credentials file {}: {source}", path.display())]
    CredentialsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(e: argon2::password_hash::Error) -> Self {
        Self::Hash(e.to_string())
    }
}
