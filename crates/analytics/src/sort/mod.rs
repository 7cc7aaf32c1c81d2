//! Multi-level table sorting
//!
//! A [`SortState`] holds up to [`MAX_SORT_LEVELS`] [`SortSpec`]s in priority
//! order. Rows are sorted lexicographically: fully by the first key, then
//! each run of rows sharing an equal first-key value is re-sorted by the
//! second key, and so on. Every level reuses its own type comparator
//! unchanged, so heterogeneous column types compose.
//!
//! Header clicks produce a new state through [`toggle_sort`]; the current
//! state is never mutated.

mod apply;
mod parse;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

pub use apply::{apply_sort, sort_by_key};
pub use parse::{parse_duration, parse_range_numeric};

/// Maximum number of simultaneous sort levels
pub const MAX_SORT_LEVELS: usize = 3;

/// Semantic type of a sortable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortType {
    /// Compared as numbers (non-numeric reads as 0)
    Numerical,
    /// Compared as strings
    Categorical,
    /// Compared as instants parsed from bucket labels
    Datetime,
    /// Compared as total seconds of strings like `2d 3h`
    Duration,
    /// Compared by a representative magnitude of strings like `10-50` or `1.2M`
    RangeNumeric,
}

impl SortType {
    /// Parse sort type from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "numerical" | "numeric" | "number" => Ok(Self::Numerical),
            "categorical" | "category" | "text" => Ok(Self::Categorical),
            "datetime" | "date" => Ok(Self::Datetime),
            "duration" => Ok(Self::Duration),
            "rangenumeric" | "range_numeric" | "range" => Ok(Self::RangeNumeric),
            _ => Err(AnalyticsError::InvalidSortSpec(format!(
                "unknown sort type: {}",
                s
            ))),
        }
    }
}

/// Granularity of datetime column labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSubtype {
    Hour,
    Date,
    Week,
    Month,
    Quarter,
}

impl DateSubtype {
    /// Parse subtype from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "date" | "day" => Ok(Self::Date),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            _ => Err(AnalyticsError::InvalidSortSpec(format!(
                "unknown date subtype: {}",
                s
            ))),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lower values first
    Ascend,
    /// Higher values first
    #[default]
    Descend,
}

impl SortOrder {
    /// Parse sort order from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ascend" | "asc" => Ok(Self::Ascend),
            "descend" | "desc" => Ok(Self::Descend),
            _ => Err(AnalyticsError::InvalidSortSpec(format!(
                "unknown sort order: {}",
                s
            ))),
        }
    }

    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascend => Self::Descend,
            Self::Descend => Self::Ascend,
        }
    }
}

/// Sort key for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key
    pub key: String,
    /// Comparator family
    #[serde(rename = "type")]
    pub sort_type: SortType,
    /// Label granularity for datetime columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<DateSubtype>,
    /// Direction
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    /// Create a spec, descending by default
    pub fn new(key: impl Into<String>, sort_type: SortType) -> Self {
        Self {
            key: key.into(),
            sort_type,
            subtype: None,
            order: SortOrder::Descend,
        }
    }

    /// Numerical column
    pub fn numerical(key: impl Into<String>) -> Self {
        Self::new(key, SortType::Numerical)
    }

    /// Categorical column
    pub fn categorical(key: impl Into<String>) -> Self {
        Self::new(key, SortType::Categorical)
    }

    /// Datetime column with label subtype
    pub fn datetime(key: impl Into<String>, subtype: DateSubtype) -> Self {
        Self::new(key, SortType::Datetime).with_subtype(subtype)
    }

    /// Set the datetime subtype
    pub fn with_subtype(mut self, subtype: DateSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    /// Set the direction
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Parse `key:type[:subtype]:order`
    ///
    /// Keys containing `:` are not supported in this form.
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let (key, sort_type, subtype, order) = match parts.as_slice() {
            [key, sort_type, order] => (*key, *sort_type, None, *order),
            [key, sort_type, subtype, order] => (*key, *sort_type, Some(*subtype), *order),
            _ => {
                return Err(AnalyticsError::InvalidSortSpec(format!(
                    "expected key:type[:subtype]:order, got '{}'",
                    s
                )));
            }
        };

        if key.is_empty() {
            return Err(AnalyticsError::InvalidSortSpec("empty key".to_string()));
        }

        Ok(Self {
            key: key.to_string(),
            sort_type: SortType::parse(sort_type)?,
            subtype: subtype.map(DateSubtype::parse).transpose()?,
            order: SortOrder::parse(order)?,
        })
    }
}

/// Ordered sort levels, primary first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<SortSpec>", into = "Vec<SortSpec>")]
pub struct SortState(Vec<SortSpec>);

impl SortState {
    /// Create a validated state (unique keys, at most [`MAX_SORT_LEVELS`])
    pub fn new(levels: Vec<SortSpec>) -> Result<Self> {
        if levels.len() > MAX_SORT_LEVELS {
            return Err(AnalyticsError::TooManySortLevels(levels.len()));
        }
        for (i, spec) in levels.iter().enumerate() {
            if levels[..i].iter().any(|prev| prev.key == spec.key) {
                return Err(AnalyticsError::DuplicateSortKey(spec.key.clone()));
            }
        }
        Ok(Self(levels))
    }

    /// No sorting
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Single-level state
    pub fn single(spec: SortSpec) -> Self {
        Self(vec![spec])
    }

    /// Levels in priority order
    pub fn levels(&self) -> &[SortSpec] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Priority position of a key (0 = primary)
    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|spec| spec.key == key)
    }

    /// Spec for a key, if sorted on
    pub fn get(&self, key: &str) -> Option<&SortSpec> {
        self.0.iter().find(|spec| spec.key == key)
    }
}

impl TryFrom<Vec<SortSpec>> for SortState {
    type Error = AnalyticsError;

    fn try_from(levels: Vec<SortSpec>) -> Result<Self> {
        Self::new(levels)
    }
}

impl From<SortState> for Vec<SortSpec> {
    fn from(state: SortState) -> Self {
        state.0
    }
}

/// Next sort state after a header click
///
/// - absent numerical column: collapse to `[clicked desc]`
/// - present and ascending: remove that level
/// - present and descending: flip to ascending in place
/// - absent with all levels in use: replace with `[clicked desc]`
/// - absent otherwise: prepend `clicked desc` as the new primary key
pub fn toggle_sort(current: &SortState, clicked: &SortSpec) -> SortState {
    let clicked_desc = clicked.clone().with_order(SortOrder::Descend);

    match current.position(&clicked.key) {
        None if clicked.sort_type == SortType::Numerical => SortState::single(clicked_desc),
        None if current.len() >= MAX_SORT_LEVELS => SortState::single(clicked_desc),
        None => {
            let mut levels = Vec::with_capacity(current.len() + 1);
            levels.push(clicked_desc);
            levels.extend(current.levels().iter().cloned());
            SortState(levels)
        }
        Some(pos) => {
            let mut levels = current.levels().to_vec();
            match levels[pos].order {
                SortOrder::Ascend => {
                    levels.remove(pos);
                }
                SortOrder::Descend => levels[pos].order = SortOrder::Ascend,
            }
            SortState(levels)
        }
    }
}
