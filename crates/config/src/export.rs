//! CSV export defaults

use serde::Deserialize;

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Report title used for the file name when `--title` is not given
    /// Default: report
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "report".to_string(),
        }
    }
}
