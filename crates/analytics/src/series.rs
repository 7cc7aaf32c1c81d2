//! Named metric series over time
//!
//! A [`Series`] is one metric (an event, a KPI) with its bucketed points and
//! a precomputed total. The total comes from the backend and may cover a
//! wider window than the visible points, so it is never re-derived here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::row::format_number;

/// A single bucketed value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Bucket start
    pub date: DateTime<Utc>,
    /// Aggregated value
    pub value: f64,
}

impl DataPoint {
    pub fn new(date: DateTime<Utc>, value: f64) -> Self {
        Self { date, value }
    }
}

/// How a metric value is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricType {
    /// Plain number
    #[default]
    #[serde(rename = "none")]
    Plain,
    /// Seconds, presented as `2d 3h`
    #[serde(rename = "date")]
    Duration,
    /// Presented as `12.5%`
    #[serde(rename = "percent")]
    Percent,
}

impl MetricType {
    /// Human rendering of a value of this type
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Plain => format_number(value),
            Self::Duration => format_duration(value),
            Self::Percent => format_percent(value),
        }
    }
}

/// A named metric series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Display name
    pub name: String,
    /// Stable key
    pub mapper: String,
    /// Points, ascending by date
    pub data_over_time: Vec<DataPoint>,
    /// Backend-computed total
    pub total: f64,
    /// Presentation of values
    #[serde(default)]
    pub metric_type: MetricType,
}

impl Series {
    /// Create a series; points are sorted ascending by date
    pub fn new(
        name: impl Into<String>,
        mapper: impl Into<String>,
        mut data_over_time: Vec<DataPoint>,
        total: f64,
    ) -> Self {
        data_over_time.sort_by_key(|p| p.date);
        Self {
            name: name.into(),
            mapper: mapper.into(),
            data_over_time,
            total,
            metric_type: MetricType::Plain,
        }
    }

    /// Set the metric type
    pub fn with_metric_type(mut self, metric_type: MetricType) -> Self {
        self.metric_type = metric_type;
        self
    }

    /// Value at an exact bucket instant
    pub fn value_at(&self, date: DateTime<Utc>) -> Option<f64> {
        self.data_over_time
            .iter()
            .find(|p| p.date == date)
            .map(|p| p.value)
    }

    pub fn is_empty(&self) -> bool {
        self.data_over_time.is_empty()
    }
}

/// Insertion-ordered series keyed by mapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesMap {
    series: Vec<Series>,
}

impl SeriesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series, replacing any existing one with the same mapper in place
    pub fn insert(&mut self, series: Series) {
        match self.series.iter_mut().find(|s| s.mapper == series.mapper) {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    /// Look up by mapper
    pub fn get(&self, mapper: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.mapper == mapper)
    }

    /// Mutable lookup by mapper
    pub fn get_mut(&mut self, mapper: &str) -> Option<&mut Series> {
        self.series.iter_mut().find(|s| s.mapper == mapper)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sorted, de-duplicated union of every series' bucket instants
    pub fn date_categories(&self) -> Vec<DateTime<Utc>> {
        let mut dates: Vec<DateTime<Utc>> = self
            .series
            .iter()
            .flat_map(|s| s.data_over_time.iter().map(|p| p.date))
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}

impl FromIterator<Series> for SeriesMap {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        let mut map = SeriesMap::new();
        for series in iter {
            map.insert(series);
        }
        map
    }
}

/// Render seconds as `2d 3h`, `5m 10s` or `45s`, omitting zero units
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0s".to_string();
    }

    let mut remaining = seconds.round() as u64;
    let mut parts = Vec::new();
    for (unit, size) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        let count = remaining / size;
        remaining %= size;
        if count > 0 {
            parts.push(format!("{}{}", count, unit));
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Render a value as `<value>%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}
