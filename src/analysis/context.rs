//! Analysis context and caller options

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::str::FromStr;

/// How pairwise task overlaps are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    Error,
    #[default]
    Warning,
    Ignore,
}

impl OverlapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapPolicy::Error => "error",
            OverlapPolicy::Warning => "warning",
            OverlapPolicy::Ignore => "ignore",
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(OverlapPolicy::Error),
            "warning" => Ok(OverlapPolicy::Warning),
            "ignore" => Ok(OverlapPolicy::Ignore),
            other => Err(format!(
                "invalid overlap policy '{}': expected error, warning or ignore",
                other
            )),
        }
    }
}

/// Section mode: tasks are parsed in `planner`, lines are inert in
/// `scratchpad`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMode {
    #[default]
    Planner,
    Scratchpad,
}

impl SectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionMode::Planner => "planner",
            SectionMode::Scratchpad => "scratchpad",
        }
    }
}

/// Caller options seeding the analysis context
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub day: Option<NaiveDate>,
    pub timezone: Option<Tz>,
    pub default_duration_min: Option<u32>,
    pub overlap_policy: Option<OverlapPolicy>,
}

/// Shared state threaded through the per-line fold
///
/// Mutation is strictly forward: a directive changes the context for lines
/// at or after it, never before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisContext {
    pub day: NaiveDate,
    pub timezone: Tz,
    pub default_duration_min: u32,
    pub overlap_policy: OverlapPolicy,
    pub section: SectionMode,
}

impl AnalysisContext {
    pub const DEFAULT_DURATION_MIN: u32 = 30;

    /// Seeds a context from caller options; the day defaults to today in
    /// the configured timezone
    pub fn seed(options: &AnalyzeOptions) -> Self {
        let timezone = options.timezone.unwrap_or(chrono_tz::UTC);
        let day = options
            .day
            .unwrap_or_else(|| Utc::now().with_timezone(&timezone).date_naive());
        Self {
            day,
            timezone,
            default_duration_min: options
                .default_duration_min
                .unwrap_or(Self::DEFAULT_DURATION_MIN),
            overlap_policy: options.overlap_policy.unwrap_or_default(),
            section: SectionMode::Planner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_applies_options_over_defaults() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let ctx = AnalysisContext::seed(&AnalyzeOptions {
            day: Some(day),
            timezone: Some(chrono_tz::America::New_York),
            default_duration_min: Some(45),
            overlap_policy: Some(OverlapPolicy::Error),
        });

        assert_eq!(ctx.day, day);
        assert_eq!(ctx.timezone, chrono_tz::America::New_York);
        assert_eq!(ctx.default_duration_min, 45);
        assert_eq!(ctx.overlap_policy, OverlapPolicy::Error);
        assert_eq!(ctx.section, SectionMode::Planner);
    }

    #[test]
    fn defaults() {
        let ctx = AnalysisContext::seed(&AnalyzeOptions::default());
        assert_eq!(ctx.timezone, chrono_tz::UTC);
        assert_eq!(ctx.default_duration_min, 30);
        assert_eq!(ctx.overlap_policy, OverlapPolicy::Warning);
    }

    #[test]
    fn policy_parses() {
        assert_eq!("error".parse::<OverlapPolicy>(), Ok(OverlapPolicy::Error));
        assert!("loud".parse::<OverlapPolicy>().is_err());
    }
}
