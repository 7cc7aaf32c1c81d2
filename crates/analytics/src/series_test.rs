//! Tests for series and metric formatting

use chrono::{DateTime, TimeZone, Utc};

use crate::series::{
    DataPoint, MetricType, Series, SeriesMap, format_duration, format_percent,
};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
}

#[test]
fn test_series_sorts_points() {
    let series = Series::new(
        "Visits",
        "visits",
        vec![DataPoint::new(day(3), 3.0), DataPoint::new(day(1), 1.0)],
        4.0,
    );
    assert_eq!(series.data_over_time[0].date, day(1));
    assert_eq!(series.value_at(day(3)), Some(3.0));
    assert_eq!(series.value_at(day(2)), None);
}

#[test]
fn test_series_map_keeps_insertion_order() {
    let mut map = SeriesMap::new();
    map.insert(Series::new("B", "b", Vec::new(), 0.0));
    map.insert(Series::new("A", "a", Vec::new(), 0.0));
    map.insert(Series::new("B2", "b", Vec::new(), 2.0));

    let names: Vec<&str> = map.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["B2", "A"]);
    assert_eq!(map.get("b").unwrap().total, 2.0);
    assert!(map.get("c").is_none());

    map.get_mut("a").unwrap().total = 9.0;
    assert_eq!(map.get("a").unwrap().total, 9.0);
}

#[test]
fn test_date_categories() {
    let map: SeriesMap = [
        Series::new("A", "a", vec![DataPoint::new(day(2), 1.0), DataPoint::new(day(1), 1.0)], 0.0),
        Series::new("B", "b", vec![DataPoint::new(day(3), 1.0), DataPoint::new(day(2), 1.0)], 0.0),
    ]
    .into_iter()
    .collect();

    assert_eq!(map.date_categories(), vec![day(1), day(2), day(3)]);
    assert!(SeriesMap::new().date_categories().is_empty());
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0.0), "0s");
    assert_eq!(format_duration(-5.0), "0s");
    assert_eq!(format_duration(45.0), "45s");
    assert_eq!(format_duration(310.0), "5m 10s");
    assert_eq!(format_duration(3_600.0), "1h");
    assert_eq!(format_duration(183_600.0), "2d 3h");
    assert_eq!(format_duration(f64::NAN), "0s");
}

#[test]
fn test_format_percent() {
    assert_eq!(format_percent(12.5), "12.5%");
    assert_eq!(format_percent(40.0), "40%");
    assert_eq!(format_percent(33.333), "33.33%");
}

#[test]
fn test_metric_type_format() {
    assert_eq!(MetricType::Plain.format(1_250.0), "1250");
    assert_eq!(MetricType::Plain.format(0.5), "0.5");
    assert_eq!(MetricType::Duration.format(90.0), "1m 30s");
    assert_eq!(MetricType::Percent.format(7.0), "7%");
}

#[test]
fn test_small_negatives_format_as_zero() {
    assert_eq!(MetricType::Plain.format(-0.004), "0");
    assert_eq!(MetricType::Plain.format(-0.0), "0");
    assert_eq!(MetricType::Plain.format(-0.25), "-0.25");
    assert_eq!(MetricType::Percent.format(-0.001), "0%");
}

#[test]
fn test_metric_type_serde() {
    assert_eq!(serde_json::to_string(&MetricType::Duration).unwrap(), "\"date\"");
    let parsed: MetricType = serde_json::from_str("\"percent\"").unwrap();
    assert_eq!(parsed, MetricType::Percent);

    let series: Series = serde_json::from_str(
        r#"{"name":"X","mapper":"x","data_over_time":[],"total":1.0}"#,
    )
    .unwrap();
    assert_eq!(series.metric_type, MetricType::Plain);
}
