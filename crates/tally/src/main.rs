//! Tally - report tables and filters for product analytics
//!
//! # Usage
//!
//! ```bash
//! # Render a table from backend result groups
//! tally table results.json
//! tally table results.json --mode breakdown --frequency week --sort Overall:numerical:desc
//!
//! # Export the same table as CSV
//! tally export results.json --title "Campaign Overview"
//!
//! # Convert filters to and from the query API wire format
//! tally filter encode clauses.json
//! tally filter decode wire.json --format text
//!
//! # With a config file
//! tally --config tally.toml table results.json
//! ```

mod cmd;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tally_config::{Config, LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tally - report tables and filters for product analytics
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides [log] level
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a sorted report table
    Table(cmd::table::TableArgs),

    /// Export a report table as CSV
    Export(cmd::export::ExportArgs),

    /// Encode or decode filters
    Filter(cmd::filter::FilterArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let directive = resolve_log_level(cli.log_level.as_deref(), &config);
    init_logging(&directive, &config.log)?;

    match cli.command {
        Command::Table(args) => cmd::table::run(args, &config),
        Command::Export(args) => cmd::export::run(args, &config),
        Command::Filter(args) => cmd::filter::run(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// `EnvFilter` directive; the CLI flag replaces the `[log] level` base
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    config.log.filter_directive(cli_level)
}

fn init_logging(directive: &str, log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    // Stdout carries the rendered output
    match log.format {
        LogFormat::Console if log.timestamps => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init(),
        LogFormat::Console => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .without_time()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    Ok(())
}
