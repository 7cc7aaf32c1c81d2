//! Analytics error types

use thiserror::Error;

/// Analytics errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Unknown operator symbol or wire code
    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    /// Unknown bucket frequency
    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Sort spec could not be parsed
    #[error("invalid sort spec: {0}")]
    InvalidSortSpec(String),

    /// Two sort levels share a column key
    #[error("duplicate sort key: {0}")]
    DuplicateSortKey(String),

    /// More sort levels than supported
    #[error("too many sort levels: {0} (max 3)")]
    TooManySortLevels(usize),

    /// Required result column is absent
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Result row does not match its headers
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// Filter draft committed before property, operator and values were chosen
    #[error("incomplete clause: missing {0}")]
    IncompleteClause(&'static str),

    /// Editor operation requires an open draft
    #[error("no clause is being edited")]
    NoDraft,

    /// Index outside the collection
    #[error("index out of range: {0}")]
    OutOfRange(usize),

    /// JSON (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Serialization(err.to_string())
    }
}

/// Result type for analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
