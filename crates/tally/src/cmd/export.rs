//! Export command - Write a report table as CSV
//!
//! # Usage
//!
//! ```bash
//! tally export results.json --title "Campaign Overview"
//! tally export results.json -m breakdown --frequency month -o reports/
//! tally export results.json --title kpi --stdout
//! ```
//!
//! The file name is derived from the title (`campaign_overview.csv`); when no
//! title is given the `[export] title` config value is used.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tally_analytics::{CsvExport, ExportOptions, to_csv};
use tally_config::Config;

use super::report::{ReportArgs, load_report};

/// Export command arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    report: ReportArgs,

    /// Report title, used for the file name
    #[arg(short, long)]
    title: Option<String>,

    /// Directory to write the CSV file into
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the CSV to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

/// Run the export command
pub fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let report = load_report(&args.report, config)?;
    let title = args.title.as_deref().unwrap_or(&config.export.title);

    let options = ExportOptions::new(title)
        .with_frequency(report.frequency)
        .with_date_label(report.date_label);
    let export = to_csv(&report.sorted_table(), &options);

    if args.stdout {
        print!("{}", export.to_csv_string());
        return Ok(());
    }

    let path = write_export(&export, &args.out_dir)?;
    eprintln!("wrote {} row(s) to {}", export.data.len(), path.display());
    Ok(())
}

/// Write the export into `dir`, returning the file path
fn write_export(export: &CsvExport, dir: &std::path::Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let path = dir.join(&export.file_name);
    std::fs::write(&path, export.to_csv_string())
        .with_context(|| format!("failed to write export file: {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = export.data.len(), "exported report");
    Ok(path)
}
