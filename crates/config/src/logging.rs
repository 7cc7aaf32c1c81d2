//! `[log]` section
//!
//! Diagnostics of the tally CLI always go to stderr; stdout carries the
//! rendered table, export or filter payload. Besides a base level, single
//! crates can be made louder or quieter, e.g. to see sort and parse details
//! from `tally_analytics` without the CLI's own chatter.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    /// Table sizes, sort levels, filter encode counts
    Debug,
    #[default]
    Info,
    /// Degraded result parses and wire decodes
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` spelling of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Stderr log format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    /// One JSON object per event, for piping into log tooling
    Json,
}

/// Logging configuration
///
/// ```toml
/// [log]
/// level = "warn"
/// format = "console"
/// timestamps = false
///
/// [log.targets]
/// tally_analytics = "debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Base level for every crate
    pub level: LogLevel,

    pub format: LogFormat,

    /// Per-crate level overrides keyed by tracing target
    pub targets: BTreeMap<String, LogLevel>,

    /// Prefix console lines with a timestamp (json output always has one)
    pub timestamps: bool,
}

impl LogConfig {
    /// Filter directive string for `EnvFilter`
    ///
    /// `base` replaces the configured base level (the `--log-level` flag);
    /// target overrides are kept either way.
    pub fn filter_directive(&self, base: Option<&str>) -> String {
        let mut directive = base.unwrap_or(self.level.as_str()).to_string();
        for (target, level) in &self.targets {
            directive.push(',');
            directive.push_str(target);
            directive.push('=');
            directive.push_str(level.as_str());
        }
        directive
    }
}
