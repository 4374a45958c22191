//! Account settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_users_file() -> String {
    "DATA/users.txt".to_string()
}

const fn default_min_password_length() -> usize {
    6
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// `username,password_hash[,role]` lines used by `mdip user seed` and `mdip init`.
    #[serde(default = "default_users_file")]
    pub users_file: String,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            min_password_length: default_min_password_length(),
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn users_file(&self) -> PathBuf {
        PathBuf::from(&self.users_file)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.min_password_length == 0 {
            return Err(ConfigError::invalid(
                "auth.min_password_length",
                "must be at least 1",
            ));
        }
        if self.users_file.trim().is_empty() {
            return Err(ConfigError::invalid("auth.users_file", "must not be empty"));
        }
        Ok(())
    }
}
