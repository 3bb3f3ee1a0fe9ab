//! Configuration file
//!
//! A JSON file with defaults for every field:
//!
//! ```json
//! {
//!   "rules_dir": "./validation",
//!   "definitions_file": "common/validationDefinitions.json",
//!   "specifics_dir": "specifics",
//!   "holidays": ["2025-01-01", "2025-12-25"],
//!   "log_level": "info"
//! }
//! ```
//!
//! `definitions_file` and `specifics_dir` are relative to `rules_dir` unless
//! absolute. `holidays`, when present, replaces the built-in calendar.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::rules::{RuleLoader, DEFAULT_DEFINITIONS_FILE, DEFAULT_SPECIFICS_DIR};
use crate::validation::FixedHolidays;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of rule files (default "./validation")
    #[serde(default = "default_rules_dir")]
    pub rules_dir: String,

    /// Shared definitions file (default "common/validationDefinitions.json")
    #[serde(default = "default_definitions_file")]
    pub definitions_file: String,

    /// Directory of per-record-type documents (default "specifics")
    #[serde(default = "default_specifics_dir")]
    pub specifics_dir: String,

    /// Holiday dates replacing the built-in 2025 calendar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holidays: Option<Vec<NaiveDate>>,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_rules_dir() -> String {
    "./validation".to_string()
}
fn default_definitions_file() -> String {
    DEFAULT_DEFINITIONS_FILE.to_string()
}
fn default_specifics_dir() -> String {
    DEFAULT_SPECIFICS_DIR.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            definitions_file: default_definitions_file(),
            specifics_dir: default_specifics_dir(),
            holidays: None,
            log_level: default_log_level(),
        }
    }
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

    /// Validate configuration values
    fn validate(&self) -> CliResult<()> {
        if self.rules_dir.trim().is_empty() {
            return Err(CliError::config_error("rules_dir must not be empty"));
        }

        if self.definitions_file.trim().is_empty() {
            return Err(CliError::config_error("definitions_file must not be empty"));
        }

        if self.specifics_dir.trim().is_empty() {
            return Err(CliError::config_error("specifics_dir must not be empty"));
        }

        self.severity()?;

        Ok(())
    }

    /// Rules directory as Path
    pub fn rules_path(&self) -> &Path {
        Path::new(&self.rules_dir)
    }

    /// Full path of the definitions file
    pub fn definitions_path(&self) -> PathBuf {
        self.rules_path().join(&self.definitions_file)
    }

    /// Full path of the specifics directory
    pub fn specifics_path(&self) -> PathBuf {
        self.rules_path().join(&self.specifics_dir)
    }

    /// Rule loader for the configured layout
    pub fn loader(&self) -> RuleLoader {
        RuleLoader::with_paths(self.definitions_path(), self.specifics_path())
    }

    /// Holiday calendar: the configured dates, or the built-in 2025 set
    pub fn calendar(&self) -> FixedHolidays {
        match &self.holidays {
            Some(dates) => dates.iter().copied().collect(),
            None => FixedHolidays::us_federal_2025(),
        }
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error.",
                self.log_level
            ))
        })
    }
}
