//! Tally Analytics
//!
//! Report table shaping, multi-level sorting and filter serialization for
//! product analytics dashboards.
//!
//! # Overview
//!
//! - **Results**: parse backend result groups into named [`Series`]
//! - **Tables**: aggregate (row per date bucket) and breakdown (row per
//!   series) presentations, sortable column titles, CSV export shaping
//! - **Sorting**: up to three lexicographic sort levels over heterogeneous
//!   column types, and the header-click state transitions
//! - **Filters**: clause editing and the AND/OR wire format of the query API
//!
//! Everything here is a pure transform: inputs are borrowed snapshots and
//! each call returns a new value.
//!
//! # Usage
//!
//! ```ignore
//! use tally_analytics::{
//!     Frequency, ResultLayout, SortSpec, SortState, TableBuilder, format_result_groups,
//!     toggle_sort,
//! };
//!
//! let series = format_result_groups(&groups, &ResultLayout::default());
//! let dates = series.date_categories();
//!
//! let table = TableBuilder::new().build_breakdown_rows(&series, &dates, Frequency::Week);
//!
//! // Header click on the Overall column
//! let state = toggle_sort(&SortState::empty(), &SortSpec::numerical("Overall"));
//! let sorted = table.sorted(&state);
//! ```
//!
//! # Filters
//!
//! ```ignore
//! use tally_analytics::{FilterClause, Operator, ValueType, from_wire, to_wire};
//!
//! let op = Operator::from_symbol("=", ValueType::Categorical)?;
//! let clauses = vec![FilterClause::event("city", op, vec!["NY".into(), "LA".into()], 0)];
//! let wire = to_wire(&clauses);
//! assert_eq!(from_wire(&wire)?, clauses);
//! ```

pub mod editor;
pub mod error;
pub mod export;
pub mod filter;
pub mod frequency;
pub mod result;
pub mod row;
pub mod series;
pub mod sort;
pub mod table;

#[cfg(test)]
mod export_test;
#[cfg(test)]
mod series_test;
#[cfg(test)]
mod sort_test;

// Re-exports for convenience
pub use editor::{EditorState, FilterEditor, GroupTarget};
pub use error::{AnalyticsError, Result};
pub use export::{CsvExport, CsvRecord, ExportOptions, to_csv};
pub use filter::{
    FilterClause, LogicalOp, Operator, PropertyType, ValueType, WireFilter, from_wire,
    from_wire_json, to_wire, to_wire_json,
};
pub use frequency::{DateLabelMode, Frequency, format_bucket_label, parse_bucket_label};
pub use result::{ResultGroup, ResultLayout, format_result_groups, parse_result_groups};
pub use row::{Cell, TableRow};
pub use series::{DataPoint, MetricType, Series, SeriesMap, format_duration, format_percent};
pub use sort::{
    DateSubtype, MAX_SORT_LEVELS, SortOrder, SortSpec, SortState, SortType, apply_sort,
    parse_duration, parse_range_numeric, sort_by_key, toggle_sort,
};
pub use table::{
    Column, ColumnTitle, SeriesKey, SortIndicator, Table, TableBuilder, TableMode,
    build_aggregate_rows, build_breakdown_rows, make_sortable_column_title,
};
