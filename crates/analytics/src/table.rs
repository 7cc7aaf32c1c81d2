//! Report table building
//!
//! Two presentations of the same [`SeriesMap`]:
//!
//! - **Aggregate**: one row per date bucket, one column per series.
//! - **Breakdown**: one row per series, one column per bucket label, plus an
//!   `Overall` column holding the series' precomputed total.
//!
//! Campaign, KPI and funnel reports all go through [`TableBuilder`]; they
//! differ only in how series map to column keys ([`SeriesKey`]) and how daily
//! labels are written ([`DateLabelMode`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frequency::{DateLabelMode, Frequency, format_bucket_label};
use crate::row::{Cell, TableRow};
use crate::series::{MetricType, Series, SeriesMap};
use crate::sort::{DateSubtype, SortOrder, SortSpec, SortState, apply_sort, toggle_sort};

/// Bucket column of aggregate tables
pub const DATE_COLUMN: &str = "date";
/// Series name column of breakdown tables
pub const MEASURES_COLUMN: &str = "measures";
/// Total column of breakdown tables
pub const OVERALL_COLUMN: &str = "Overall";

/// Row keys a series column may not take
const RESERVED_ROW_KEYS: [&str; 2] = [DATE_COLUMN, "index"];

/// Table presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// One row per bucket
    #[default]
    Aggregate,
    /// One row per series
    Breakdown,
}

impl TableMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::Breakdown => "breakdown",
        }
    }
}

impl std::str::FromStr for TableMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggregate" | "sparkline" => Ok(Self::Aggregate),
            "breakdown" | "date" => Ok(Self::Breakdown),
            _ => Err(format!("unknown table mode: {}", s)),
        }
    }
}

/// Which series field becomes the aggregate column key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKey {
    /// Display name
    #[default]
    Name,
    /// Stable mapper key
    Mapper,
}

impl SeriesKey {
    fn of<'a>(&self, series: &'a Series) -> &'a str {
        match self {
            Self::Name => &series.name,
            Self::Mapper => &series.mapper,
        }
    }
}

/// A displayed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Cell key in each row
    pub key: String,
    /// Header text
    pub label: String,
    /// Sort semantics of the column
    pub sort: SortSpec,
}

impl Column {
    fn new(key: impl Into<String>, label: impl Into<String>, sort: SortSpec) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sort,
        }
    }
}

/// Sort state of one header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortIndicator {
    /// Direction when the column is sorted on
    pub order: Option<SortOrder>,
    /// 1-based priority, reported only when several levels are active
    pub priority: Option<usize>,
}

impl SortIndicator {
    /// Arrow plus optional priority, e.g. `▼2`
    pub fn symbol(&self) -> String {
        let arrow = match self.order {
            Some(SortOrder::Ascend) => "▲",
            Some(SortOrder::Descend) => "▼",
            None => return String::new(),
        };
        match self.priority {
            Some(p) => format!("{}{}", arrow, p),
            None => arrow.to_string(),
        }
    }
}

/// Header title with sort state and click contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTitle {
    pub display_label: String,
    pub sort_indicator: SortIndicator,
    /// Spec the header sorts by when clicked
    pub spec: SortSpec,
}

impl ColumnTitle {
    /// Sort state after this header is clicked
    pub fn click(&self, current: &SortState) -> SortState {
        toggle_sort(current, &self.spec)
    }
}

/// Title for a sortable header under the current sort state
pub fn make_sortable_column_title(label: &str, spec: &SortSpec, current: &SortState) -> ColumnTitle {
    let sort_indicator = match current.position(&spec.key) {
        Some(pos) => SortIndicator {
            order: Some(current.levels()[pos].order),
            priority: (current.len() > 1).then_some(pos + 1),
        },
        None => SortIndicator::default(),
    };

    ColumnTitle {
        display_label: label.to_string(),
        sort_indicator,
        spec: spec.clone(),
    }
}

/// Rows plus column metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub mode: TableMode,
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
    /// Metric presentation by series column key (aggregate) or series name (breakdown)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metric_types: BTreeMap<String, MetricType>,
}

impl Table {
    fn empty(mode: TableMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column by key
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Copy of the table with rows ordered by `state`
    pub fn sorted(&self, state: &SortState) -> Table {
        Table {
            rows: apply_sort(&self.rows, state),
            ..self.clone()
        }
    }

    /// Header titles under `state`, in column order
    pub fn column_titles(&self, state: &SortState) -> Vec<ColumnTitle> {
        self.columns
            .iter()
            .map(|c| make_sortable_column_title(&c.label, &c.sort, state))
            .collect()
    }

    /// Metric presentation for a cell of this table
    pub fn metric_type_for(&self, row: &TableRow, column: &str) -> MetricType {
        let key = match self.mode {
            TableMode::Aggregate => column.to_string(),
            TableMode::Breakdown => row.get(MEASURES_COLUMN).as_text(),
        };
        self.metric_types.get(&key).copied().unwrap_or_default()
    }
}

/// Builds report tables from series
#[derive(Debug, Clone, Copy, Default)]
pub struct TableBuilder {
    series_key: SeriesKey,
    date_label: DateLabelMode,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how series map to aggregate column keys
    pub fn with_series_key(mut self, series_key: SeriesKey) -> Self {
        self.series_key = series_key;
        self
    }

    /// Set how daily labels are written
    pub fn with_date_label(mut self, date_label: DateLabelMode) -> Self {
        self.date_label = date_label;
        self
    }

    /// One row per bucket, one column per series
    ///
    /// Buckets a series has no point for hold [`Cell::Null`]; values are
    /// never interpolated.
    pub fn build_aggregate_rows(&self, series: &SeriesMap, date_categories: &[DateTime<Utc>]) -> Table {
        if series.is_empty() {
            return Table::empty(TableMode::Aggregate);
        }

        let mut columns = vec![Column::new(
            DATE_COLUMN,
            "Date",
            SortSpec::datetime(DATE_COLUMN, DateSubtype::Date),
        )];
        let keys = self.column_keys(series);
        let mut metric_types = BTreeMap::new();
        for (s, key) in series.iter().zip(&keys) {
            let sort = SortSpec::numerical(key.clone());
            columns.push(Column::new(key.clone(), s.name.clone(), sort));
            metric_types.insert(key.clone(), s.metric_type);
        }

        let rows = date_categories
            .iter()
            .enumerate()
            .map(|(index, &date)| {
                let mut row = TableRow::new(index).with(DATE_COLUMN, date);
                for (s, key) in series.iter().zip(&keys) {
                    let cell = s.value_at(date).map(Cell::Number).unwrap_or(Cell::Null);
                    row.insert(key.clone(), cell);
                }
                row
            })
            .collect::<Vec<_>>();

        tracing::debug!(rows = rows.len(), columns = columns.len(), "built aggregate table");

        Table {
            mode: TableMode::Aggregate,
            columns,
            rows,
            metric_types,
        }
    }

    /// Aggregate column key per series, in series order
    ///
    /// Keys that collide with `date`, `index` or an earlier series get a
    /// numeric suffix (`date_1`).
    fn column_keys(&self, series: &SeriesMap) -> Vec<String> {
        let mut keys: Vec<String> = Vec::with_capacity(series.len());
        for s in series.iter() {
            let base = self.series_key.of(s);
            let taken = |key: &str| {
                RESERVED_ROW_KEYS.iter().any(|r| *r == key) || keys.iter().any(|k| k == key)
            };

            let mut key = base.to_string();
            let mut suffix = 0;
            while taken(&key) {
                suffix += 1;
                key = format!("{}_{}", base, suffix);
            }
            if suffix > 0 {
                tracing::warn!(
                    series = %s.name,
                    key = %key,
                    "series key collides with another column, renamed"
                );
            }
            keys.push(key);
        }
        keys
    }

    /// One row per series, one column per bucket label, plus `Overall`
    ///
    /// Instants that format to the same label share a column; the later
    /// bucket's value wins unless that bucket has no point.
    pub fn build_breakdown_rows(
        &self,
        series: &SeriesMap,
        date_categories: &[DateTime<Utc>],
        frequency: Frequency,
    ) -> Table {
        if series.is_empty() {
            return Table::empty(TableMode::Breakdown);
        }

        let labels: Vec<String> = date_categories
            .iter()
            .map(|&date| format_bucket_label(date, frequency, self.date_label))
            .collect();

        let mut columns = vec![Column::new(
            MEASURES_COLUMN,
            "Measures",
            SortSpec::categorical(MEASURES_COLUMN),
        )];
        for label in &labels {
            if columns.iter().any(|c| &c.key == label) {
                tracing::debug!(label = %label, "bucket label collision");
                continue;
            }
            columns.push(Column::new(
                label.clone(),
                label.clone(),
                SortSpec::numerical(label.clone()),
            ));
        }
        columns.push(Column::new(
            OVERALL_COLUMN,
            OVERALL_COLUMN,
            SortSpec::numerical(OVERALL_COLUMN),
        ));

        let mut metric_types = BTreeMap::new();
        let rows = series
            .iter()
            .enumerate()
            .map(|(index, s)| {
                metric_types.insert(s.name.clone(), s.metric_type);
                let mut row = TableRow::new(index).with(MEASURES_COLUMN, s.name.clone());
                for (label, &date) in labels.iter().zip(date_categories) {
                    let cell = s.value_at(date).map(Cell::Number).unwrap_or(Cell::Null);
                    if cell.is_null() && row.cells.contains_key(label) {
                        continue;
                    }
                    row.insert(label.clone(), cell);
                }
                row.insert(OVERALL_COLUMN, s.total);
                row
            })
            .collect::<Vec<_>>();

        tracing::debug!(rows = rows.len(), columns = columns.len(), %frequency, "built breakdown table");

        Table {
            mode: TableMode::Breakdown,
            columns,
            rows,
            metric_types,
        }
    }
}

/// [`TableBuilder::build_aggregate_rows`] with default settings
pub fn build_aggregate_rows(series: &SeriesMap, date_categories: &[DateTime<Utc>]) -> Table {
    TableBuilder::new().build_aggregate_rows(series, date_categories)
}

/// [`TableBuilder::build_breakdown_rows`] with default settings
pub fn build_breakdown_rows(
    series: &SeriesMap,
    date_categories: &[DateTime<Utc>],
    frequency: Frequency,
) -> Table {
    TableBuilder::new().build_breakdown_rows(series, date_categories, frequency)
}
