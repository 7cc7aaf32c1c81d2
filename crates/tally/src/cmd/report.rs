//! Report loading shared by the table and export commands
//!
//! Reads backend result groups from a JSON file, parses them into series and
//! builds the requested table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tally_analytics::{
    DateLabelMode, Frequency, ResultGroup, ResultLayout, SeriesKey, SortSpec, SortState, Table,
    TableBuilder, TableMode, format_result_groups, toggle_sort,
};
use tally_config::{Config, DateLabel, SeriesKeyField};

/// Input arguments common to every report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Result groups JSON file (`[{"headers": [...], "rows": [[...]]}]`)
    #[arg(value_name = "RESULTS")]
    pub input: PathBuf,

    /// Table mode (aggregate, breakdown)
    #[arg(short, long, default_value = "aggregate")]
    pub mode: String,

    /// Bucket frequency (hour, date, week, month, quarter); defaults to [table] frequency
    #[arg(long)]
    pub frequency: Option<String>,

    /// Sort level `key:type[:subtype]:order`, primary first (repeatable, max 3)
    #[arg(short, long = "sort", value_name = "SPEC")]
    pub sort: Vec<String>,

    /// Header click `key:type[:subtype]`, applied in order after --sort (repeatable)
    #[arg(long = "click", value_name = "SPEC")]
    pub click: Vec<String>,
}

/// A built table with the settings used to render it
#[derive(Debug)]
pub struct Report {
    pub table: Table,
    pub sort: SortState,
    pub frequency: Frequency,
    pub date_label: DateLabelMode,
}

impl Report {
    /// Table with rows in sort order
    pub fn sorted_table(&self) -> Table {
        self.table.sorted(&self.sort)
    }
}

/// Load result groups and build the table described by `args`
pub fn load_report(args: &ReportArgs, config: &Config) -> Result<Report> {
    let mode: TableMode = args
        .mode
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid mode: {}", e))?;

    let frequency_name = args.frequency.as_deref().unwrap_or(&config.table.frequency);
    let frequency = Frequency::parse(frequency_name).context("invalid --frequency")?;

    let sort = sort_state(&args.sort, &args.click)?;

    let groups = read_groups(&args.input)?;
    let series = format_result_groups(&groups, &result_layout(config));
    if series.is_empty() {
        tracing::warn!(path = %args.input.display(), "no series in results");
    }

    let date_label = date_label_mode(config.table.date_label);
    let builder = TableBuilder::new()
        .with_series_key(series_key(config.table.series_key))
        .with_date_label(date_label);

    let dates = series.date_categories();
    let table = match mode {
        TableMode::Aggregate => builder.build_aggregate_rows(&series, &dates),
        TableMode::Breakdown => builder.build_breakdown_rows(&series, &dates, frequency),
    };

    tracing::info!(
        mode = mode.as_str(),
        frequency = %frequency,
        series = series.len(),
        rows = table.rows.len(),
        sort_levels = sort.len(),
        "built report table"
    );

    Ok(Report {
        table,
        sort,
        frequency,
        date_label,
    })
}

/// Build the sort state from explicit levels and then replay header clicks
pub fn sort_state(levels: &[String], clicks: &[String]) -> Result<SortState> {
    let specs = levels
        .iter()
        .map(|s| SortSpec::parse(s).with_context(|| format!("invalid --sort '{}'", s)))
        .collect::<Result<Vec<_>>>()?;
    let mut state = SortState::new(specs).context("invalid sort levels")?;

    for click in clicks {
        // Clicks carry no order; toggling decides it
        let spec = SortSpec::parse(&format!("{}:desc", click))
            .with_context(|| format!("invalid --click '{}'", click))?;
        state = toggle_sort(&state, &spec);
    }

    Ok(state)
}

fn read_groups(path: &Path) -> Result<Vec<ResultGroup>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read results file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse results file: {}", path.display()))
}

fn result_layout(config: &Config) -> ResultLayout {
    ResultLayout {
        marker_column: config.result.marker_column.clone(),
        aggregate_column: config.result.aggregate_column.clone(),
        entity_column: config.result.entity_column.clone(),
    }
}

fn date_label_mode(label: DateLabel) -> DateLabelMode {
    match label {
        DateLabel::WithYear => DateLabelMode::WithYear,
        DateLabel::Short => DateLabelMode::Short,
    }
}

fn series_key(field: SeriesKeyField) -> SeriesKey {
    match field {
        SeriesKeyField::Name => SeriesKey::Name,
        SeriesKeyField::Mapper => SeriesKey::Mapper,
    }
}
