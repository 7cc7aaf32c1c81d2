//! Table rendering defaults

use serde::Deserialize;

/// Frequency names accepted in `[table] frequency`
pub const KNOWN_FREQUENCIES: &[&str] = &[
    "hour", "hourly", "1h", "date", "day", "daily", "1d", "week", "weekly", "1w", "month",
    "monthly", "quarter", "quarterly",
];

/// Check if a frequency name is known
pub fn is_known_frequency(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    KNOWN_FREQUENCIES.contains(&name.as_str())
}

/// Whether day labels carry the year
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateLabel {
    /// `Mar 5, 2024`
    #[default]
    WithYear,
    /// `Mar 5`
    Short,
}

/// Which series field keys aggregate-table columns
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKeyField {
    /// Display name
    #[default]
    Name,
    /// Stable mapper key
    Mapper,
}

/// Table configuration
///
/// # Example
///
/// ```toml
/// [table]
/// frequency = "week"
/// date_label = "short"
/// series_key = "mapper"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Bucket frequency used when the CLI gets none
    /// Default: date
    pub frequency: String,

    /// Day label style
    /// Default: with_year
    pub date_label: DateLabel,

    /// Column key of aggregate tables
    /// Default: name
    pub series_key: SeriesKeyField,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            frequency: "date".to_string(),
            date_label: DateLabel::WithYear,
            series_key: SeriesKeyField::Name,
        }
    }
}
