//! Configuration handling
//!
//! A plan file may sit next to a `dayplan.toml` carrying analyzer defaults.
//! CLI flags override file values; the file overrides built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{AnalyzeOptions, OverlapPolicy};
use crate::syntax::parse_duration_literal;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid timezone '{0}' in configuration")]
    InvalidTimezone(String),

    #[error("invalid overlap policy '{0}' in configuration")]
    InvalidPolicy(String),

    #[error("invalid default duration '{0}' in configuration")]
    InvalidDuration(String),
}

/// The file name looked up next to the analyzed document
pub const CONFIG_FILE_NAME: &str = "dayplan.toml";

/// Analyzer defaults loaded from `dayplan.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Day the schedule belongs to (YYYY-MM-DD)
    pub day: Option<NaiveDate>,

    /// IANA timezone name, e.g. `Europe/Paris`
    pub timezone: Option<String>,

    /// Default task duration literal, e.g. `45m` or `1h30m`
    pub default_duration: Option<String>,

    /// Overlap policy: `error`, `warning` or `ignore`
    pub overlap_policy: Option<String>,
}

impl FileConfig {
    /// Loads the config sitting next to `document`, if any
    pub fn load_for(document: &Path) -> Result<Option<Self>> {
        let dir = document.parent().unwrap_or_else(|| Path::new("."));
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(Some(config))
    }

    /// Converts the raw file values into validated analyzer options
    pub fn into_options(self) -> Result<AnalyzeOptions, ConfigError> {
        let timezone = self
            .timezone
            .map(|tz| {
                tz.parse::<chrono_tz::Tz>()
                    .map_err(|_| ConfigError::InvalidTimezone(tz))
            })
            .transpose()?;

        let overlap_policy = self
            .overlap_policy
            .map(|p| {
                p.parse::<OverlapPolicy>()
                    .map_err(|_| ConfigError::InvalidPolicy(p))
            })
            .transpose()?;

        let default_duration_min = self
            .default_duration
            .map(|d| parse_duration_literal(&d).ok_or(ConfigError::InvalidDuration(d)))
            .transpose()?;

        Ok(AnalyzeOptions {
            day: self.day,
            timezone,
            default_duration_min,
            overlap_policy,
        })
    }
}

/// Layers CLI-provided options over file-provided ones
pub fn merge_options(file: AnalyzeOptions, cli: AnalyzeOptions) -> AnalyzeOptions {
    AnalyzeOptions {
        day: cli.day.or(file.day),
        timezone: cli.timezone.or(file.timezone),
        default_duration_min: cli.default_duration_min.or(file.default_duration_min),
        overlap_policy: cli.overlap_policy.or(file.overlap_policy),
    }
}
