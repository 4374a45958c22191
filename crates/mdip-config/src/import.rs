//! CSV source locations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_data_dir() -> String {
    "DATA".to_string()
}

fn default_incidents_file() -> String {
    "cyber_incidents.csv".to_string()
}

fn default_datasets_file() -> String {
    "datasets_metadata.csv".to_string()
}

fn default_tickets_file() -> String {
    "it_tickets.csv".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_incidents_file")]
    pub incidents_file: String,

    #[serde(default = "default_datasets_file")]
    pub datasets_file: String,

    #[serde(default = "default_tickets_file")]
    pub tickets_file: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            incidents_file: default_incidents_file(),
            datasets_file: default_datasets_file(),
            tickets_file: default_tickets_file(),
        }
    }
}

impl ImportConfig {
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("import.data_dir", &self.data_dir),
            ("import.incidents_file", &self.incidents_file),
            ("import.datasets_file", &self.datasets_file),
            ("import.tickets_file", &self.tickets_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }
}
