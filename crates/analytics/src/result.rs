//! Backend result groups
//!
//! The report API answers with a list of result groups, each a header row
//! plus rows of JSON values. One group holds a `datetime` marker column and
//! one metric column per entity; another holds one `aggregate` row per
//! entity. Columns are always located by header name, never by position.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AnalyticsError, Result};
use crate::series::{DataPoint, Series, SeriesMap};

/// One header + rows block of a backend response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultGroup {
    /// Column names
    pub headers: Vec<String>,
    /// Row data as JSON values
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl ResultGroup {
    /// Create a new result group
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    /// Position of a column by header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check if the group holds a column
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header names that give result groups their meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLayout {
    /// Bucket instant column of the time-series group
    pub marker_column: String,
    /// Total column of the aggregate group
    pub aggregate_column: String,
    /// Entity name column of the aggregate group
    pub entity_column: String,
}

impl Default for ResultLayout {
    fn default() -> Self {
        Self {
            marker_column: "datetime".to_string(),
            aggregate_column: "aggregate".to_string(),
            entity_column: "name".to_string(),
        }
    }
}

/// Parse result groups into series, one per entity column
///
/// # Errors
///
/// Returns [`AnalyticsError::MissingColumn`] when no group carries the marker
/// column, and [`AnalyticsError::MalformedRow`] when a row is shorter than
/// its headers or a marker value is not a date.
pub fn parse_result_groups(groups: &[ResultGroup], layout: &ResultLayout) -> Result<SeriesMap> {
    let timeline = groups
        .iter()
        .find(|g| g.has_column(&layout.marker_column))
        .ok_or_else(|| AnalyticsError::MissingColumn(layout.marker_column.clone()))?;
    let marker = timeline
        .column_index(&layout.marker_column)
        .ok_or_else(|| AnalyticsError::MissingColumn(layout.marker_column.clone()))?;

    let totals = groups
        .iter()
        .find(|g| g.has_column(&layout.aggregate_column))
        .map(|g| read_totals(g, layout))
        .transpose()?
        .unwrap_or_default();

    let mut series = SeriesMap::new();
    for (col, entity) in timeline.headers.iter().enumerate() {
        if col == marker {
            continue;
        }

        let mut points = Vec::with_capacity(timeline.rows.len());
        for (i, row) in timeline.rows.iter().enumerate() {
            if row.len() != timeline.headers.len() {
                return Err(AnalyticsError::MalformedRow(format!(
                    "row {} has {} values for {} headers",
                    i,
                    row.len(),
                    timeline.headers.len()
                )));
            }
            let date = parse_instant(&row[marker]).ok_or_else(|| {
                AnalyticsError::MalformedRow(format!(
                    "row {} has invalid {}: {}",
                    i, layout.marker_column, row[marker]
                ))
            })?;
            if let Some(value) = number(&row[col]) {
                points.push(DataPoint::new(date, value));
            }
        }

        let total = totals
            .iter()
            .find(|(name, _)| name == entity)
            .map(|(_, total)| *total)
            .unwrap_or(0.0);

        series.insert(Series::new(entity.clone(), entity.clone(), points, total));
    }

    Ok(series)
}

/// Parse result groups, degrading any failure to an empty map
///
/// Parse problems are logged at warn level.
pub fn format_result_groups(groups: &[ResultGroup], layout: &ResultLayout) -> SeriesMap {
    match parse_result_groups(groups, layout) {
        Ok(series) => {
            tracing::debug!(series = series.len(), "parsed result groups");
            series
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                groups = groups.len(),
                "failed to parse result groups, rendering no data"
            );
            SeriesMap::new()
        }
    }
}

fn read_totals(group: &ResultGroup, layout: &ResultLayout) -> Result<Vec<(String, f64)>> {
    let entity = group
        .column_index(&layout.entity_column)
        .ok_or_else(|| AnalyticsError::MissingColumn(layout.entity_column.clone()))?;
    let aggregate = group
        .column_index(&layout.aggregate_column)
        .ok_or_else(|| AnalyticsError::MissingColumn(layout.aggregate_column.clone()))?;

    let mut totals = Vec::with_capacity(group.rows.len());
    for (i, row) in group.rows.iter().enumerate() {
        let (Some(name), Some(total)) = (row.get(entity), row.get(aggregate)) else {
            return Err(AnalyticsError::MalformedRow(format!(
                "aggregate row {} is missing values",
                i
            )));
        };
        let name = match name {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        totals.push((name, number(total).unwrap_or(0.0)));
    }
    Ok(totals)
}

/// Finite numeric value of a cell; `"NaN"` and `"inf"` strings count as missing
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

/// Parse a bucket instant
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD` and epoch milliseconds.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        }
        _ => None,
    }
}
