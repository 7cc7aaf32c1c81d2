//! Table command - Render a report table from backend result groups
//!
//! # Usage
//!
//! ```bash
//! tally table results.json
//! tally table results.json --mode breakdown --frequency week
//! tally table results.json -m breakdown --sort Overall:numerical:desc --format csv
//! tally table results.json --click measures:categorical --click measures:categorical
//! ```

use anyhow::Result;
use clap::Args;
use tally_analytics::{ColumnTitle, CsvExport, ExportOptions, SortState, Table, to_csv};
use tally_config::Config;

use super::report::{Report, ReportArgs, load_report};

/// Widest rendered column before values are truncated
const MAX_COLUMN_WIDTH: usize = 50;

/// Table command arguments
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    report: ReportArgs,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    format: String,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// Run the table command
pub fn run(args: TableArgs, config: &Config) -> Result<()> {
    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid format: {}", e))?;

    let report = load_report(&args.report, config)?;
    let table = report.sorted_table();

    match format {
        OutputFormat::Table => output_table(&table, &report),
        OutputFormat::Json => output_json(&table, &report.sort)?,
        OutputFormat::Csv => print!("{}", rendered(&table, &report).to_csv_string()),
    }

    eprintln!("\n{} row(s) [{}]", table.rows.len(), table.mode.as_str());
    Ok(())
}

/// Cells rendered as the user sees them
fn rendered(table: &Table, report: &Report) -> CsvExport {
    let options = ExportOptions::new("")
        .with_frequency(report.frequency)
        .with_date_label(report.date_label);
    to_csv(table, &options)
}

/// Header label followed by its sort indicator, e.g. `Overall ▼1`
fn header_label(title: &ColumnTitle) -> String {
    let symbol = title.sort_indicator.symbol();
    if symbol.is_empty() {
        title.display_label.clone()
    } else {
        format!("{} {}", title.display_label, symbol)
    }
}

/// Output as ASCII table
fn output_table(table: &Table, report: &Report) {
    for line in render_ascii(table, report) {
        println!("{}", line);
    }
}

fn render_ascii(table: &Table, report: &Report) -> Vec<String> {
    if table.is_empty() {
        return vec!["(empty table)".to_string()];
    }

    let headers: Vec<String> = table
        .column_titles(&report.sort)
        .iter()
        .map(header_label)
        .collect();
    let rows: Vec<Vec<String>> = rendered(table, report)
        .data
        .iter()
        .map(|record| record.values().map(str::to_string).collect())
        .collect();

    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.chars().count());
            }
        }
    }
    for w in &mut widths {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_padded(&headers, &widths));
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(sep.join("-+-"));
    for row in &rows {
        lines.push(join_padded(row, &widths));
    }
    lines
}

fn join_padded(values: &[String], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(v, &w)| {
            let len = v.chars().count();
            if len > w {
                let truncated: String = v.chars().take(w.saturating_sub(3)).collect();
                format!("{}...", truncated)
            } else {
                format!("{}{}", v, " ".repeat(w - len))
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Output as JSON with columns, sort state and raw rows
fn output_json(table: &Table, sort: &SortState) -> Result<()> {
    let json = serde_json::json!({
        "mode": table.mode,
        "sort": sort,
        "columns": table.column_titles(sort),
        "rows": table.rows,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_analytics::{
        DataPoint, DateLabelMode, Frequency, Series, SeriesMap, SortSpec, build_breakdown_rows,
        toggle_sort,
    };

    fn report() -> Report {
        let d0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let series: SeriesMap = [
            Series::new("Visits", "visits", vec![DataPoint::new(d0, 10.0)], 10.0),
            Series::new("Signups", "signups", vec![DataPoint::new(d0, 2.0)], 2.0),
        ]
        .into_iter()
        .collect();

        let table = build_breakdown_rows(&series, &[d0], Frequency::Date);
        let sort = toggle_sort(&SortState::empty(), &SortSpec::numerical("Overall"));
        Report {
            table,
            sort,
            frequency: Frequency::Date,
            date_label: DateLabelMode::WithYear,
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_ascii() {
        let report = report();
        let lines = render_ascii(&report.sorted_table(), &report);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Measures | Mar 1, 2024 | Overall ▼");
        assert_eq!(lines[1], "---------+-------------+----------");
        assert_eq!(lines[2], "Visits   | 10          | 10       ");
        assert_eq!(lines[3], "Signups  | 2           | 2        ");
    }

    #[test]
    fn test_render_ascii_empty() {
        let mut report = report();
        report.table.rows.clear();
        assert_eq!(render_ascii(&report.table, &report), vec!["(empty table)"]);
    }

    #[test]
    fn test_join_padded_truncates() {
        let values = vec!["abcdefghij".to_string()];
        assert_eq!(join_padded(&values, &[6]), "abc...");
    }
}
