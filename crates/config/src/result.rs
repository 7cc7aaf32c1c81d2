//! Result group header names

use serde::Deserialize;

/// Header names the report API uses in its result groups
///
/// # Example
///
/// ```toml
/// [result]
/// marker_column = "datetime"
/// aggregate_column = "aggregate"
/// entity_column = "name"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResultConfig {
    /// Bucket instant column of the time-series group
    pub marker_column: String,

    /// Total column of the aggregate group
    pub aggregate_column: String,

    /// Entity name column of the aggregate group
    pub entity_column: String,
}

impl Default for ResultConfig {
    fn default() -> Self {
        Self {
            marker_column: "datetime".to_string(),
            aggregate_column: "aggregate".to_string(),
            entity_column: "name".to_string(),
        }
    }
}

impl ResultConfig {
    /// Columns paired with their field names, for validation
    pub(crate) fn named_columns(&self) -> [(&'static str, &str); 3] {
        [
            ("marker_column", self.marker_column.as_str()),
            ("aggregate_column", self.aggregate_column.as_str()),
            ("entity_column", self.entity_column.as_str()),
        ]
    }
}
