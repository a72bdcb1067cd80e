//! Configuration file
//!
//! ```json
//! { "data_dir": "./data", "index_name": "default", "log_severity": "info" }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Name of the index served from the data directory
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Lowest log severity written (trace, info, warn, error, fatal)
    #[serde(default = "default_log_severity")]
    pub log_severity: String,
}

fn default_index_name() -> String {
    "default".to_string()
}

fn default_log_severity() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.index_name.trim().is_empty() {
            return Err(CliError::config_error("index_name must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Configured minimum log severity
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_severity).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_severity: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_severity
            ))
        })
    }
}
