//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error - required field missing or empty
    #[error("[{section}] is missing required field '{field}'")]
    MissingField {
        /// Config section (e.g., "result")
        section: &'static str,
        /// Missing field name
        field: &'static str,
    },

    /// Validation error - invalid value
    #[error("[{section}] has invalid {field}: {message}")]
    InvalidValue {
        /// Config section
        section: &'static str,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },

    /// Validation error - two result columns share a header name
    #[error("[result] {first} and {second} both name column '{column}'")]
    DuplicateColumn {
        /// First field
        first: &'static str,
        /// Second field
        second: &'static str,
        /// The shared header name
        column: String,
    },
}

impl ConfigError {
    /// Create a MissingField error
    pub fn missing_field(section: &'static str, field: &'static str) -> Self {
        Self::MissingField { section, field }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        section: &'static str,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            section,
            field,
            message: message.into(),
        }
    }

    /// Create a DuplicateColumn error
    pub fn duplicate_column(
        first: &'static str,
        second: &'static str,
        column: impl Into<String>,
    ) -> Self {
        Self::DuplicateColumn {
            first,
            second,
            column: column.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = ConfigError::missing_field("result", "marker_column");
        assert!(err.to_string().contains("[result]"));
        assert!(err.to_string().contains("marker_column"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("table", "frequency", "unknown frequency 'yearly'");
        assert!(err.to_string().contains("frequency"));
        assert!(err.to_string().contains("yearly"));
    }

    #[test]
    fn test_duplicate_column_error() {
        let err = ConfigError::duplicate_column("marker_column", "entity_column", "name");
        let msg = err.to_string();
        assert!(msg.contains("marker_column"));
        assert!(msg.contains("entity_column"));
        assert!(msg.contains("'name'"));
    }
}
