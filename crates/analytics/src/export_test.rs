//! Tests for CSV export shaping

use chrono::{DateTime, TimeZone, Utc};

use crate::export::{ExportOptions, file_name, to_csv};
use crate::frequency::Frequency;
use crate::series::{DataPoint, MetricType, Series, SeriesMap};
use crate::table::{build_aggregate_rows, build_breakdown_rows};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
}

fn sample() -> SeriesMap {
    [
        Series::new(
            "Sessions",
            "sessions",
            vec![DataPoint::new(day(1), 120.0), DataPoint::new(day(2), 80.0)],
            200.0,
        ),
        Series::new(
            "Avg. Time",
            "avg_time",
            vec![DataPoint::new(day(1), 93_600.0), DataPoint::new(day(2), 310.0)],
            7_380.0,
        )
        .with_metric_type(MetricType::Duration),
        Series::new(
            "Bounce",
            "bounce",
            vec![DataPoint::new(day(1), 12.5)],
            12.5,
        )
        .with_metric_type(MetricType::Percent),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_aggregate_export() {
    let table = build_aggregate_rows(&sample(), &[day(1), day(2)]);
    let export = to_csv(
        &table,
        &ExportOptions::new("Campaign Overview").with_frequency(Frequency::Date),
    );

    assert_eq!(export.file_name, "campaign_overview.csv");
    assert_eq!(export.headers, vec!["Date", "Sessions", "Avg. Time", "Bounce"]);
    assert_eq!(export.data.len(), 2);

    let first = &export.data[0];
    assert_eq!(first.get("Date"), Some("Mar 1, 2024"));
    assert_eq!(first.get("Sessions"), Some("120"));
    assert_eq!(first.get("Avg. Time"), Some("1d 2h"));
    assert_eq!(first.get("Bounce"), Some("12.5%"));

    let second = &export.data[1];
    assert_eq!(second.get("Avg. Time"), Some("5m 10s"));
    assert_eq!(second.get("Bounce"), Some(""));
}

#[test]
fn test_aggregate_export_relabels_dates() {
    let table = build_aggregate_rows(&sample(), &[day(1)]);
    let export = to_csv(&table, &ExportOptions::new("kpi").with_frequency(Frequency::Month));
    assert_eq!(export.data[0].get("Date"), Some("Mar 2024"));
}

#[test]
fn test_breakdown_export() {
    let table = build_breakdown_rows(&sample(), &[day(1), day(2)], Frequency::Date);
    let export = to_csv(&table, &ExportOptions::new("Funnel: weekly"));

    assert_eq!(export.file_name, "funnel_weekly.csv");
    assert_eq!(
        export.headers,
        vec!["Measures", "Mar 1, 2024", "Mar 2, 2024", "Overall"]
    );

    let time = &export.data[1];
    assert_eq!(time.get("Measures"), Some("Avg. Time"));
    assert_eq!(time.get("Mar 1, 2024"), Some("1d 2h"));
    assert_eq!(time.get("Overall"), Some("2h 3m"));

    let bounce = &export.data[2];
    assert_eq!(bounce.get("Overall"), Some("12.5%"));
}

#[test]
fn test_export_has_no_index() {
    let table = build_aggregate_rows(&sample(), &[day(1)]);
    let export = to_csv(&table, &ExportOptions::new("x"));
    assert!(export.data[0].get("index").is_none());

    let json = serde_json::to_value(&export).unwrap();
    let record = &json["data"][0];
    assert!(record.is_object());
    assert!(record.get("index").is_none());
    assert_eq!(record["Sessions"], "120");
}

#[test]
fn test_csv_string_quotes_labels() {
    let table = build_breakdown_rows(&sample(), &[day(1)], Frequency::Date);
    let csv = to_csv(&table, &ExportOptions::new("r")).to_csv_string();

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Measures,\"Mar 1, 2024\",Overall"));
    assert_eq!(lines.next(), Some("Sessions,120,200"));
}

#[test]
fn test_file_name() {
    assert_eq!(file_name("Campaign Overview"), "campaign_overview.csv");
    assert_eq!(file_name("  KPI -- Q1 / 2024 "), "kpi_q1_2024.csv");
    assert_eq!(file_name(""), "report.csv");
    assert_eq!(file_name("!!!"), "report.csv");
}

#[test]
fn test_empty_table_exports_header_only() {
    let table = build_aggregate_rows(&SeriesMap::new(), &[day(1)]);
    let export = to_csv(&table, &ExportOptions::new("empty"));
    assert!(export.data.is_empty());
    assert!(export.headers.is_empty());
}
