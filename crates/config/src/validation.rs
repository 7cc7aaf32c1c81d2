//! Configuration validation
//!
//! Validates config consistency:
//! - Result column names are non-empty and distinct
//! - The default table frequency is known
//! - Log target names are usable filter targets

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::table::is_known_frequency;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_result(config)?;
    validate_table(config)?;
    validate_log(config)?;
    Ok(())
}

/// Validate result column names
fn validate_result(config: &Config) -> Result<()> {
    let columns = config.result.named_columns();

    for (field, column) in &columns {
        if column.trim().is_empty() {
            return Err(ConfigError::missing_field("result", *field));
        }
    }

    for (i, (first, a)) in columns.iter().enumerate() {
        if let Some((second, _)) = columns[i + 1..].iter().find(|(_, b)| b == a) {
            return Err(ConfigError::duplicate_column(*first, *second, *a));
        }
    }

    Ok(())
}

/// Validate table defaults
fn validate_table(config: &Config) -> Result<()> {
    if !is_known_frequency(&config.table.frequency) {
        return Err(ConfigError::invalid_value(
            "table",
            "frequency",
            format!("unknown frequency '{}'", config.table.frequency),
        ));
    }
    Ok(())
}

/// Validate per-target log overrides
fn validate_log(config: &Config) -> Result<()> {
    for target in config.log.targets.keys() {
        if target.trim().is_empty() || target.contains([',', '=', ' ']) {
            return Err(ConfigError::invalid_value(
                "log",
                "targets",
                format!("invalid log target '{}'", target),
            ));
        }
    }
    Ok(())
}
