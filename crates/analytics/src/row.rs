//! Table row and cell types
//!
//! Rows are plain mappings from column key to cell, plus a stable `index`
//! used as row identity (selection, CSV row skipping).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value (sparse series point)
    #[default]
    Null,
    /// Numeric value
    Number(f64),
    /// Bucket instant
    Date(DateTime<Utc>),
    /// Text value (labels, formatted strings)
    Text(String),
}

impl Cell {
    /// Numeric view of the cell, coercing anything non-numeric to 0
    pub fn as_number(&self) -> f64 {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Cell::Date(d) => d.timestamp_millis() as f64,
            Cell::Null => 0.0,
        };
        if value.is_nan() { 0.0 } else { value }
    }

    /// String view of the cell (empty for null)
    pub fn as_text(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Date(d) => d.to_rfc3339(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Check if the cell holds no value
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::Date(value)
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Stable row identity
    pub index: usize,
    /// Cells keyed by column key
    #[serde(flatten)]
    pub cells: BTreeMap<String, Cell>,
}

impl TableRow {
    /// Create an empty row
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
        }
    }

    /// Set a cell, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.cells.insert(key.into(), value.into());
        self
    }

    /// Set a cell
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Cell>) {
        self.cells.insert(key.into(), value.into());
    }

    /// Get a cell; missing keys read as null
    pub fn get(&self, key: &str) -> &Cell {
        static NULL: Cell = Cell::Null;
        self.cells.get(key).unwrap_or(&NULL)
    }
}

/// Render a number without a trailing `.0` for integral values
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let s = format!("{:.2}", n);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    }
}
