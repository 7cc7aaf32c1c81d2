//! Tests for sorting and sort state transitions

use chrono::{TimeZone, Utc};

use crate::row::{Cell, TableRow};
use crate::sort::{
    DateSubtype, SortOrder, SortSpec, SortState, SortType, apply_sort, parse_duration,
    parse_range_numeric, sort_by_key, toggle_sort,
};

fn rows_with(key: &str, values: &[Cell]) -> Vec<TableRow> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| TableRow::new(i).with(key, v.clone()))
        .collect()
}

fn indices(rows: &[TableRow]) -> Vec<usize> {
    rows.iter().map(|r| r.index).collect()
}

#[test]
fn test_parse_duration_examples() {
    assert_eq!(parse_duration("45s"), 45.0);
    assert_eq!(parse_duration("5m 10s"), 310.0);
    assert_eq!(parse_duration("2h 3m"), 7380.0);
    assert_eq!(parse_duration("1d 2h"), 93600.0);
}

#[test]
fn test_parse_duration_degrades() {
    assert_eq!(parse_duration(""), 0.0);
    assert_eq!(parse_duration("n/a"), 0.0);
    assert_eq!(parse_duration("2d3h"), 183600.0);
}

#[test]
fn test_parse_range_numeric_examples() {
    assert_eq!(parse_range_numeric("10-50"), 50.0);
    assert_eq!(parse_range_numeric("100+"), 101.0);
    assert_eq!(parse_range_numeric("1.2M"), 1_200_000.0);
}

#[test]
fn test_parse_range_numeric_symbols() {
    assert_eq!(parse_range_numeric("$1,000-$5,000"), 5000.0);
    assert_eq!(parse_range_numeric("2B"), 2e9);
    assert_eq!(parse_range_numeric("1M+"), 1_000_001.0);
    assert_eq!(parse_range_numeric("unknown"), 0.0);
    assert_eq!(parse_range_numeric(""), 0.0);
}

#[test]
fn test_sort_numerical() {
    let rows = rows_with("v", &[Cell::Number(3.0), Cell::Number(1.0), Cell::Number(2.0)]);

    let asc = sort_by_key(&rows, &SortSpec::numerical("v").with_order(SortOrder::Ascend));
    assert_eq!(indices(&asc), vec![1, 2, 0]);

    let desc = sort_by_key(&rows, &SortSpec::numerical("v"));
    assert_eq!(indices(&desc), vec![0, 2, 1]);
}

#[test]
fn test_sort_numerical_coerces_to_zero() {
    let rows = rows_with(
        "v",
        &[
            Cell::Number(-1.0),
            Cell::Text("abc".into()),
            Cell::Null,
            Cell::Number(f64::NAN),
            Cell::Text("5".into()),
        ],
    );

    let asc = sort_by_key(&rows, &SortSpec::numerical("v").with_order(SortOrder::Ascend));
    // -1, then the three zero-valued cells in input order, then 5
    assert_eq!(indices(&asc), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_sort_categorical() {
    let rows = rows_with("c", &[Cell::from("banana"), Cell::from("apple"), Cell::from("cherry")]);

    let asc = sort_by_key(&rows, &SortSpec::categorical("c").with_order(SortOrder::Ascend));
    assert_eq!(indices(&asc), vec![1, 0, 2]);
}

#[test]
fn test_sort_datetime_day_labels() {
    let rows = rows_with(
        "d",
        &[
            Cell::from("Feb 1, 2024"),
            Cell::from("Dec 31, 2023"),
            Cell::from("Jan 15, 2024"),
        ],
    );

    let spec = SortSpec::datetime("d", DateSubtype::Date).with_order(SortOrder::Ascend);
    assert_eq!(indices(&sort_by_key(&rows, &spec)), vec![1, 2, 0]);
}

#[test]
fn test_sort_datetime_hour_labels() {
    let rows = rows_with(
        "d",
        &[
            Cell::from("1 PM, Jan 5"),
            Cell::from("12 AM, Jan 5"),
            Cell::from("11 AM, Jan 5"),
        ],
    );

    let spec = SortSpec::datetime("d", DateSubtype::Hour).with_order(SortOrder::Ascend);
    assert_eq!(indices(&sort_by_key(&rows, &spec)), vec![1, 2, 0]);
}

#[test]
fn test_sort_datetime_week_uses_start() {
    let rows = rows_with(
        "w",
        &[
            Cell::from("Jan 8, 2024 to Jan 14, 2024"),
            Cell::from("Jan 1, 2024 to Jan 7, 2024"),
        ],
    );

    let spec = SortSpec::datetime("w", DateSubtype::Week).with_order(SortOrder::Ascend);
    assert_eq!(indices(&sort_by_key(&rows, &spec)), vec![1, 0]);
}

#[test]
fn test_sort_datetime_month_and_quarter() {
    let months = rows_with("m", &[Cell::from("Mar 2024"), Cell::from("Nov 2023")]);
    let spec = SortSpec::datetime("m", DateSubtype::Month).with_order(SortOrder::Ascend);
    assert_eq!(indices(&sort_by_key(&months, &spec)), vec![1, 0]);

    let quarters = rows_with("q", &[Cell::from("Q1 2024"), Cell::from("Q4 2023"), Cell::from("Q2 2024")]);
    let spec = SortSpec::datetime("q", DateSubtype::Quarter);
    assert_eq!(indices(&sort_by_key(&quarters, &spec)), vec![2, 0, 1]);
}

#[test]
fn test_sort_datetime_cells() {
    let d0 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let d1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let rows = rows_with("date", &[Cell::Date(d0), Cell::Date(d1)]);

    let spec = SortSpec::datetime("date", DateSubtype::Date).with_order(SortOrder::Ascend);
    assert_eq!(indices(&sort_by_key(&rows, &spec)), vec![1, 0]);
}

#[test]
fn test_sort_duration() {
    let rows = rows_with("t", &[Cell::from("1d 2h"), Cell::from("45s"), Cell::from("5m 10s")]);

    let spec = SortSpec::new("t", SortType::Duration).with_order(SortOrder::Ascend);
    assert_eq!(indices(&sort_by_key(&rows, &spec)), vec![1, 2, 0]);
}

#[test]
fn test_sort_range_numeric() {
    let rows = rows_with("r", &[Cell::from("100+"), Cell::from("10-50"), Cell::from("1.2M")]);

    let spec = SortSpec::new("r", SortType::RangeNumeric);
    assert_eq!(indices(&sort_by_key(&rows, &spec)), vec![2, 0, 1]);
}

#[test]
fn test_sort_nan_reads_as_zero() {
    let values: Vec<Cell> = [5.0, f64::NAN, 1.0, 3.0, 2.0, f64::NAN, 4.0]
        .into_iter()
        .map(Cell::Number)
        .collect();
    let rows = rows_with("v", &values);

    for sort_type in [SortType::Numerical, SortType::Duration, SortType::RangeNumeric] {
        let spec = SortSpec::new("v", sort_type).with_order(SortOrder::Ascend);
        let sorted = sort_by_key(&rows, &spec);
        assert_eq!(indices(&sorted), vec![1, 5, 2, 4, 3, 6, 0], "{:?}", sort_type);
        assert_eq!(indices(&sort_by_key(&sorted, &spec)), indices(&sorted));
    }
}

#[test]
fn test_apply_sort_empty_is_identity() {
    let rows = rows_with("v", &[Cell::Number(3.0), Cell::Number(1.0)]);
    assert_eq!(apply_sort(&rows, &SortState::empty()), rows);
}

#[test]
fn test_apply_sort_single_level_matches_sort_by_key() {
    let rows = rows_with("v", &[Cell::Number(3.0), Cell::Number(1.0), Cell::Number(2.0)]);
    let spec = SortSpec::numerical("v");
    assert_eq!(
        apply_sort(&rows, &SortState::single(spec.clone())),
        sort_by_key(&rows, &spec)
    );
}

fn grid() -> Vec<TableRow> {
    // (channel, region, visits)
    [
        ("email", "eu", 10.0),
        ("ads", "us", 5.0),
        ("email", "us", 7.0),
        ("ads", "eu", 5.0),
        ("email", "eu", 3.0),
        ("ads", "us", 9.0),
    ]
    .iter()
    .enumerate()
    .map(|(i, (channel, region, visits))| {
        TableRow::new(i)
            .with("channel", *channel)
            .with("region", *region)
            .with("visits", *visits)
    })
    .collect()
}

#[test]
fn test_apply_sort_two_levels() {
    let state = SortState::new(vec![
        SortSpec::categorical("channel").with_order(SortOrder::Descend),
        SortSpec::numerical("visits").with_order(SortOrder::Ascend),
    ])
    .unwrap();

    let sorted = apply_sort(&grid(), &state);
    // email rows by visits asc, then ads rows by visits asc (ties keep input order)
    assert_eq!(indices(&sorted), vec![4, 2, 0, 1, 3, 5]);
}

#[test]
fn test_apply_sort_three_levels() {
    let state = SortState::new(vec![
        SortSpec::categorical("channel").with_order(SortOrder::Ascend),
        SortSpec::categorical("region").with_order(SortOrder::Ascend),
        SortSpec::numerical("visits").with_order(SortOrder::Descend),
    ])
    .unwrap();

    let sorted = apply_sort(&grid(), &state);
    assert_eq!(indices(&sorted), vec![3, 5, 1, 0, 4, 2]);
}

#[test]
fn test_apply_sort_is_idempotent() {
    let state = SortState::new(vec![
        SortSpec::numerical("visits"),
        SortSpec::categorical("region").with_order(SortOrder::Ascend),
    ])
    .unwrap();

    let once = apply_sort(&grid(), &state);
    let twice = apply_sort(&once, &state);
    assert_eq!(indices(&once), indices(&twice));
}

#[test]
fn test_toggle_cycle_numeric() {
    let x = SortSpec::numerical("clicks");

    let s1 = toggle_sort(&SortState::empty(), &x);
    assert_eq!(s1.levels(), &[x.clone().with_order(SortOrder::Descend)]);

    let s2 = toggle_sort(&s1, &x);
    assert_eq!(s2.levels(), &[x.clone().with_order(SortOrder::Ascend)]);

    let s3 = toggle_sort(&s2, &x);
    assert!(s3.is_empty());
}

#[test]
fn test_toggle_numeric_collapses_multi_level() {
    let state = SortState::new(vec![
        SortSpec::categorical("channel"),
        SortSpec::categorical("region"),
    ])
    .unwrap();

    let next = toggle_sort(&state, &SortSpec::numerical("visits"));
    assert_eq!(next.len(), 1);
    assert_eq!(next.levels()[0].key, "visits");
    assert_eq!(next.levels()[0].order, SortOrder::Descend);
}

#[test]
fn test_toggle_prepends_non_numeric() {
    let state = SortState::single(SortSpec::numerical("visits"));

    let next = toggle_sort(&state, &SortSpec::categorical("channel").with_order(SortOrder::Ascend));
    let keys: Vec<&str> = next.levels().iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["channel", "visits"]);
    assert_eq!(next.levels()[0].order, SortOrder::Descend);
}

#[test]
fn test_toggle_flips_in_place() {
    let state = SortState::new(vec![
        SortSpec::categorical("channel"),
        SortSpec::categorical("region"),
    ])
    .unwrap();

    let next = toggle_sort(&state, &SortSpec::categorical("region"));
    assert_eq!(next.levels()[1].key, "region");
    assert_eq!(next.levels()[1].order, SortOrder::Ascend);
    assert_eq!(next.levels()[0].order, SortOrder::Descend);
}

#[test]
fn test_toggle_removes_ascending_level() {
    let state = SortState::new(vec![
        SortSpec::categorical("channel"),
        SortSpec::categorical("region").with_order(SortOrder::Ascend),
        SortSpec::numerical("visits"),
    ])
    .unwrap();

    let next = toggle_sort(&state, &SortSpec::categorical("region"));
    let keys: Vec<&str> = next.levels().iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["channel", "visits"]);
}

#[test]
fn test_toggle_evicts_when_full() {
    let state = SortState::new(vec![
        SortSpec::categorical("a"),
        SortSpec::categorical("b"),
        SortSpec::categorical("c"),
    ])
    .unwrap();

    let next = toggle_sort(&state, &SortSpec::categorical("d"));
    assert_eq!(next.len(), 1);
    assert_eq!(next.levels()[0].key, "d");
}

#[test]
fn test_toggle_never_duplicates_keys() {
    let mut state = SortState::empty();
    for key in ["a", "b", "a", "c", "b", "a", "d"] {
        state = toggle_sort(&state, &SortSpec::categorical(key));
        assert!(SortState::new(state.levels().to_vec()).is_ok());
    }
}

#[test]
fn test_sort_state_validation() {
    assert!(
        SortState::new(vec![SortSpec::numerical("a"), SortSpec::categorical("a")]).is_err()
    );
    assert!(
        SortState::new(vec![
            SortSpec::numerical("a"),
            SortSpec::numerical("b"),
            SortSpec::numerical("c"),
            SortSpec::numerical("d"),
        ])
        .is_err()
    );
}

#[test]
fn test_sort_spec_parse() {
    let spec = SortSpec::parse("visits:numerical:asc").unwrap();
    assert_eq!(spec.key, "visits");
    assert_eq!(spec.sort_type, SortType::Numerical);
    assert_eq!(spec.order, SortOrder::Ascend);

    let spec = SortSpec::parse("date:datetime:week:descend").unwrap();
    assert_eq!(spec.subtype, Some(DateSubtype::Week));
    assert_eq!(spec.order, SortOrder::Descend);

    assert!(SortSpec::parse("visits").is_err());
    assert!(SortSpec::parse("visits:bogus:asc").is_err());
    assert!(SortSpec::parse(":numerical:asc").is_err());
}

#[test]
fn test_sort_state_deserialize() {
    let json = r#"[{"key":"visits","type":"numerical","order":"ascend"},
                   {"key":"when","type":"datetime","subtype":"month","order":"descend"}]"#;
    let state: SortState = serde_json::from_str(json).unwrap();
    assert_eq!(state.len(), 2);
    assert_eq!(state.levels()[1].subtype, Some(DateSubtype::Month));

    let dup = r#"[{"key":"a","type":"numerical"},{"key":"a","type":"categorical"}]"#;
    assert!(serde_json::from_str::<SortState>(dup).is_err());
}
