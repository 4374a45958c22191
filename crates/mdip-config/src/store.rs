//! Local store configuration.

use std::time::Duration;

use mdip_db::retry::RetryConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_path() -> String {
    "mdip.db".to_string()
}

const fn default_busy_retries() -> u32 {
    4
}

const fn default_busy_base_delay_ms() -> u64 {
    100
}

const fn default_busy_max_delay_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Database file, relative to the working directory unless absolute.
    #[serde(default = "default_path")]
    pub path: String,

    /// Attempts (including the first) for a statement that hits a locked store.
    #[serde(default = "default_busy_retries")]
    pub busy_retries: u32,

    #[serde(default = "default_busy_base_delay_ms")]
    pub busy_base_delay_ms: u64,

    #[serde(default = "default_busy_max_delay_ms")]
    pub busy_max_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_retries: default_busy_retries(),
            busy_base_delay_ms: default_busy_base_delay_ms(),
            busy_max_delay_ms: default_busy_max_delay_ms(),
        }
    }
}

impl StoreConfig {
    /// Backoff policy handed to the store on open.
    #[must_use]
    pub const fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.busy_retries,
            base_delay: Duration::from_millis(self.busy_base_delay_ms),
            max_delay: Duration::from_millis(self.busy_max_delay_ms),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::invalid("store.path", "must not be empty"));
        }
        if self.busy_retries == 0 {
            return Err(ConfigError::invalid(
                "store.busy_retries",
                "must be at least 1",
            ));
        }
        if self.busy_max_delay_ms < self.busy_base_delay_ms {
            return Err(ConfigError::invalid(
                "store.busy_max_delay_ms",
                "must not be below store.busy_base_delay_ms",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retry_policy_matches_store_default() {
        let policy = StoreConfig::default().retry_config();
        let expected = RetryConfig::default();
        assert_eq!(policy.max_attempts, expected.max_attempts);
        assert_eq!(policy.base_delay, expected.base_delay);
        assert_eq!(policy.max_delay, expected.max_delay);
    }

    #[test]
    fn zero_retries_is_invalid() {
        let config = StoreConfig {
            busy_retries: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "store.busy_retries"
        ));
    }

    #[test]
    fn blank_path_is_invalid() {
        let config = StoreConfig {
            path: "  ".into(),
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
