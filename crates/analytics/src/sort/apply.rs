//! Row ordering for single and multi-level sort states

use std::cmp::Ordering;

use crate::frequency::parse_bucket_label;
use crate::row::{Cell, TableRow};
use crate::sort::parse::{parse_duration, parse_range_numeric};
use crate::sort::{DateSubtype, SortOrder, SortSpec, SortState, SortType};

/// Sort rows by every level of `state`
///
/// An empty state returns the rows unchanged.
pub fn apply_sort(rows: &[TableRow], state: &SortState) -> Vec<TableRow> {
    if state.is_empty() {
        return rows.to_vec();
    }
    tracing::debug!(rows = rows.len(), levels = state.len(), "applying sort");
    sort_levels(rows.to_vec(), state.levels())
}

/// Sort rows by a single key
pub fn sort_by_key(rows: &[TableRow], spec: &SortSpec) -> Vec<TableRow> {
    sort_levels(rows.to_vec(), std::slice::from_ref(spec))
}

/// Sort by the first level, then each run of equal first-level values by the rest
fn sort_levels(rows: Vec<TableRow>, levels: &[SortSpec]) -> Vec<TableRow> {
    let Some((spec, rest)) = levels.split_first() else {
        return rows;
    };

    let mut keyed: Vec<(SortKey, TableRow)> = rows
        .into_iter()
        .map(|row| (SortKey::extract(&row, spec), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| directed(a.compare(b), spec.order));

    if rest.is_empty() {
        return keyed.into_iter().map(|(_, row)| row).collect();
    }

    let mut sorted = Vec::with_capacity(keyed.len());
    let mut run = Vec::new();
    let mut run_key: Option<SortKey> = None;

    for (key, row) in keyed {
        if let Some(prev) = &run_key
            && prev.compare(&key) != Ordering::Equal
        {
            sorted.extend(sort_levels(std::mem::take(&mut run), rest));
        }
        run_key = Some(key);
        run.push(row);
    }
    sorted.extend(sort_levels(run, rest));

    sorted
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascend => ordering,
        SortOrder::Descend => ordering.reverse(),
    }
}

/// Comparable projection of a cell for one sort type
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn extract(row: &TableRow, spec: &SortSpec) -> Self {
        let cell = row.get(&spec.key);
        match spec.sort_type {
            SortType::Numerical => SortKey::Number(cell.as_number()),
            SortType::Categorical => SortKey::Text(cell.as_text()),
            SortType::Datetime => SortKey::Number(datetime_millis(cell, spec.subtype)),
            SortType::Duration => SortKey::number(match cell {
                Cell::Number(n) => *n,
                other => parse_duration(&other.as_text()),
            }),
            SortType::RangeNumeric => SortKey::number(match cell {
                Cell::Number(n) => *n,
                other => parse_range_numeric(&other.as_text()),
            }),
        }
    }

    /// NaN reads as 0 so numeric keys stay totally ordered
    fn number(n: f64) -> Self {
        SortKey::Number(if n.is_nan() { 0.0 } else { n })
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// Instant of a datetime cell in epoch milliseconds; unparseable reads as 0
fn datetime_millis(cell: &Cell, subtype: Option<DateSubtype>) -> f64 {
    match cell {
        Cell::Date(date) => date.timestamp_millis() as f64,
        Cell::Text(label) => parse_bucket_label(label, subtype.unwrap_or(DateSubtype::Date))
            .map(|date| date.timestamp_millis() as f64)
            .unwrap_or(0.0),
        Cell::Number(n) if !n.is_nan() => *n,
        _ => 0.0,
    }
}
