//! Bucket frequency and date label formatting
//!
//! Breakdown tables key their columns by a human label of the bucket date.
//! The label pattern depends on the frequency:
//!
//! | Frequency | Pattern                          | Example                        |
//! |-----------|----------------------------------|--------------------------------|
//! | hour      | `h A, MMM D`                     | `3 PM, Jan 5`                  |
//! | date      | `MMM D, YYYY` / `MMM D`          | `Jan 5, 2024`                  |
//! | week      | `MMM D, YYYY to MMM D, YYYY`     | `Jan 1, 2024 to Jan 7, 2024`   |
//! | month     | `MMM YYYY`                       | `Jan 2024`                     |
//! | quarter   | `Qn YYYY`                        | `Q1 2024`                      |
//!
//! Labels are parsed back into instants when a datetime column is sorted.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::sort::DateSubtype;

/// Year used to resolve labels that omit it (leap year so `Feb 29` parses)
const REFERENCE_YEAR: i32 = 2000;

/// Separator between the start and end of a week label
pub const WEEK_SEPARATOR: &str = " to ";

/// Time bucket frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Per hour
    Hour,
    /// Per day
    #[default]
    Date,
    /// Per ISO week (Monday start)
    Week,
    /// Per month
    Month,
    /// Per quarter
    Quarter,
}

impl Frequency {
    /// Parse frequency from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "hourly" | "1h" => Ok(Self::Hour),
            "date" | "day" | "daily" | "1d" => Ok(Self::Date),
            "week" | "weekly" | "1w" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            _ => Err(AnalyticsError::InvalidFrequency(s.to_string())),
        }
    }

    /// Datetime sort subtype matching labels of this frequency
    pub fn date_subtype(&self) -> DateSubtype {
        match self {
            Self::Hour => DateSubtype::Hour,
            Self::Date => DateSubtype::Date,
            Self::Week => DateSubtype::Week,
            Self::Month => DateSubtype::Month,
            Self::Quarter => DateSubtype::Quarter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Date => "date",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether daily labels carry the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLabelMode {
    /// `MMM D, YYYY`
    #[default]
    WithYear,
    /// `MMM D`
    Short,
}

/// Format a bucket instant as a column label
pub fn format_bucket_label(date: DateTime<Utc>, frequency: Frequency, mode: DateLabelMode) -> String {
    match frequency {
        Frequency::Hour => date.format("%-I %p, %b %-d").to_string(),
        Frequency::Date => match mode {
            DateLabelMode::WithYear => date.format("%b %-d, %Y").to_string(),
            DateLabelMode::Short => date.format("%b %-d").to_string(),
        },
        Frequency::Week => {
            let start = start_of_week(date.date_naive());
            let end = start + Duration::days(6);
            format!(
                "{}{}{}",
                start.format("%b %-d, %Y"),
                WEEK_SEPARATOR,
                end.format("%b %-d, %Y")
            )
        }
        Frequency::Month => date.format("%b %Y").to_string(),
        Frequency::Quarter => format!("Q{} {}", (date.month() - 1) / 3 + 1, date.year()),
    }
}

/// Parse a label produced by [`format_bucket_label`] back into an instant
///
/// Returns `None` for anything that does not match the subtype's pattern.
pub fn parse_bucket_label(label: &str, subtype: DateSubtype) -> Option<DateTime<Utc>> {
    let label = label.trim();
    let date = match subtype {
        DateSubtype::Hour => return parse_hour_label(label),
        DateSubtype::Date => parse_day(label)?,
        DateSubtype::Week => {
            let start = label
                .split_once(WEEK_SEPARATOR)
                .map(|(start, _)| start)
                .unwrap_or(label);
            parse_day(start)?
        }
        DateSubtype::Month => NaiveDate::parse_from_str(&format!("1 {}", label), "%d %b %Y").ok()?,
        DateSubtype::Quarter => parse_quarter(label)?,
    };
    date.and_hms_opt(0, 0, 0).map(|t| t.and_utc())
}

/// Monday of the ISO week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%b %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{} {}", s, REFERENCE_YEAR), "%b %d %Y"))
        .ok()
}

fn parse_hour_label(label: &str) -> Option<DateTime<Utc>> {
    let (time, day) = label.split_once(", ")?;
    let mut parts = time.split_whitespace();
    let hour: u32 = parts.next()?.parse().ok()?;
    let meridiem = parts.next()?;
    if hour == 0 || hour > 12 {
        return None;
    }

    let hour = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return None,
    };

    parse_day(day)?.and_hms_opt(hour, 0, 0).map(|t| t.and_utc())
}

fn parse_quarter(label: &str) -> Option<NaiveDate> {
    let rest = label.strip_prefix('Q').or_else(|| label.strip_prefix('q'))?;
    let (quarter, year) = rest.split_once(' ')?;
    let quarter: u32 = quarter.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;
    if !(1..=4).contains(&quarter) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
}
