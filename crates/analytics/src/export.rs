//! CSV export shaping
//!
//! Turns a [`Table`] into flat string records for the file writer: no row
//! index, no nested values, dates and metrics rendered as the user sees them.

use serde::{Serialize, Serializer};

use crate::frequency::{DateLabelMode, Frequency, format_bucket_label};
use crate::row::Cell;
use crate::series::MetricType;
use crate::table::{DATE_COLUMN, Table, TableMode};

/// Export settings
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Report title, used for the file name
    pub title: String,
    /// Frequency used to label the date column of aggregate tables
    pub frequency: Frequency,
    /// Daily label style
    pub date_label: DateLabelMode,
}

impl ExportOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the date column frequency
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the daily label style
    pub fn with_date_label(mut self, date_label: DateLabelMode) -> Self {
        self.date_label = date_label;
        self
    }
}

/// One exported row, header to rendered value, in column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvRecord(pub Vec<(String, String)>);

impl CsvRecord {
    /// Value under a header
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }
}

impl Serialize for CsvRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// File name and flat records ready for a CSV writer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvExport {
    /// Suggested file name, e.g. `campaign_overview.csv`
    pub file_name: String,
    /// Header row
    pub headers: Vec<String>,
    /// One record per table row
    pub data: Vec<CsvRecord>,
}

impl CsvExport {
    /// Render as RFC 4180 text with a header line
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| csv_escape(h)).collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for record in &self.data {
            let values: Vec<String> = record.values().map(csv_escape).collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }
}

/// Shape a table for CSV export
///
/// Aggregate tables keep their date column, relabelled for the export
/// frequency. Breakdown tables drop it. Duration and percent metrics are
/// rendered as `2d 3h` and `12.5%`.
pub fn to_csv(table: &Table, options: &ExportOptions) -> CsvExport {
    let columns: Vec<_> = table
        .columns
        .iter()
        .filter(|c| !(table.mode == TableMode::Breakdown && c.key == DATE_COLUMN))
        .collect();

    let data = table
        .rows
        .iter()
        .map(|row| {
            CsvRecord(
                columns
                    .iter()
                    .map(|col| {
                        let cell = row.get(&col.key);
                        let value = if col.key == DATE_COLUMN {
                            render_date(cell, options)
                        } else {
                            render_metric(cell, table.metric_type_for(row, &col.key))
                        };
                        (col.label.clone(), value)
                    })
                    .collect(),
            )
        })
        .collect();

    CsvExport {
        file_name: file_name(&options.title),
        headers: columns.iter().map(|c| c.label.clone()).collect(),
        data,
    }
}

fn render_date(cell: &Cell, options: &ExportOptions) -> String {
    match cell {
        Cell::Date(date) => format_bucket_label(*date, options.frequency, options.date_label),
        other => other.as_text(),
    }
}

fn render_metric(cell: &Cell, metric_type: MetricType) -> String {
    match cell {
        Cell::Number(n) => metric_type.format(*n),
        other => other.as_text(),
    }
}

/// File name derived from a report title: lowercase words joined by `_`
pub fn file_name(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        "report.csv".to_string()
    } else {
        format!("{}.csv", slug)
    }
}

/// Quote a field if it contains a comma, quote or newline
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('\n') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
