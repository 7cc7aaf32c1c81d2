//! Tally Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use tally_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[table]\nfrequency = \"week\"").unwrap();
//! assert_eq!(config.table.frequency, "week");
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "console"
//! timestamps = false
//!
//! [log.targets]
//! tally_analytics = "debug"
//!
//! [table]
//! frequency = "date"
//! date_label = "with_year"
//! series_key = "name"
//!
//! [result]
//! marker_column = "datetime"
//! aggregate_column = "aggregate"
//! entity_column = "name"
//!
//! [export]
//! title = "report"
//! ```

mod error;
mod export;
mod logging;
mod result;
mod table;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use export::ExportConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use result::ResultConfig;
pub use table::{DateLabel, KNOWN_FREQUENCIES, SeriesKeyField, TableConfig, is_known_frequency};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Table rendering defaults
    pub table: TableConfig,

    /// Result group header names
    pub result: ResultConfig,

    /// CSV export defaults
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, contains invalid TOML, or fails
    /// validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks for:
    /// - Empty or shared result column names
    /// - Unknown default frequency
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
