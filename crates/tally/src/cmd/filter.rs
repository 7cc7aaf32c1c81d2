//! Filter command - Convert filters between clause and wire form
//!
//! # Usage
//!
//! ```bash
//! # Clauses (as kept by the query builder) -> query API payload
//! tally filter encode clauses.json
//!
//! # Query API payload -> clauses
//! tally filter decode wire.json
//! tally filter decode wire.json --format text
//! cat wire.json | tally filter decode -
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tally_analytics::{FilterClause, from_wire_json, to_wire};

/// Filter command arguments
#[derive(Args, Debug)]
pub struct FilterArgs {
    #[command(subcommand)]
    command: FilterCommand,
}

#[derive(Subcommand, Debug)]
enum FilterCommand {
    /// Encode filter clauses (JSON array) into wire filters
    Encode {
        /// Clauses JSON file, or `-` for stdin
        #[arg(value_name = "CLAUSES")]
        input: PathBuf,
    },

    /// Decode wire filters (JSON array) into clauses
    Decode {
        /// Wire filters JSON file, or `-` for stdin
        #[arg(value_name = "WIRE")]
        input: PathBuf,

        /// Output format (json, text)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}

/// Run the filter command
pub fn run(args: FilterArgs) -> Result<()> {
    match args.command {
        FilterCommand::Encode { input } => {
            let content = read_input(&input)?;
            let clauses: Vec<FilterClause> =
                serde_json::from_str(&content).context("failed to parse filter clauses")?;

            let wire = to_wire(&clauses);
            tracing::debug!(clauses = clauses.len(), entries = wire.len(), "encoded filters");
            println!("{}", serde_json::to_string_pretty(&wire)?);
        }
        FilterCommand::Decode { input, format } => {
            let content = read_input(&input)?;
            let clauses = from_wire_json(&content).context("failed to decode wire filters")?;

            match format.to_lowercase().as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&clauses)?),
                "text" => println!("{}", describe(&clauses)),
                other => return Err(anyhow::anyhow!("invalid format: {}", other)),
            }
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return Ok(content);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read filter file: {}", path.display()))
}

/// Human-readable filter expression, e.g. `(city = NY, LA OR plan = pro) AND age > 21`
fn describe(clauses: &[FilterClause]) -> String {
    let mut refs: Vec<i64> = Vec::new();
    for clause in clauses {
        if !refs.contains(&clause.ref_id) {
            refs.push(clause.ref_id);
        }
    }

    let groups: Vec<String> = refs
        .iter()
        .map(|ref_id| {
            let members: Vec<String> = clauses
                .iter()
                .filter(|c| c.ref_id == *ref_id)
                .map(|c| {
                    let symbol = c
                        .operator
                        .symbol(c.value_type)
                        .unwrap_or_else(|| c.operator.wire_code());
                    format!("{} {} {}", c.property, symbol, c.values.join(", "))
                })
                .collect();

            if members.len() > 1 && refs.len() > 1 {
                format!("({})", members.join(" OR "))
            } else {
                members.join(" OR ")
            }
        })
        .collect();

    if groups.is_empty() {
        "(no filters)".to_string()
    } else {
        groups.join(" AND ")
    }
}
