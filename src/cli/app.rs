//! Main CLI application structure

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::output::{Output, OutputFormat};
use super::{check, shift_cmd, show};
use crate::analysis::{AnalyzeOptions, OverlapPolicy};
use crate::config::{merge_options, FileConfig};
use crate::editor;
use crate::syntax::parse_duration_literal;

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(author, version, about = "Plain-text day planning: analyze, validate and edit schedules")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Analyzer options shared by document commands
#[derive(Args, Debug, Clone)]
pub struct AnalyzerArgs {
    /// Day the schedule belongs to (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub day: Option<chrono::NaiveDate>,

    /// IANA timezone name, e.g. Europe/Paris
    #[arg(long)]
    pub tz: Option<chrono_tz::Tz>,

    /// Default task duration, e.g. 45m or 1h30m
    #[arg(long)]
    pub duration: Option<String>,

    /// Overlap policy: error, warning or ignore
    #[arg(long)]
    pub policy: Option<OverlapPolicy>,
}

impl AnalyzerArgs {
    /// Builds caller options, layered over any `dayplan.toml` next to the
    /// document
    pub fn resolve(&self, document: &std::path::Path) -> Result<AnalyzeOptions> {
        let default_duration_min = self
            .duration
            .as_deref()
            .map(|d| {
                parse_duration_literal(d)
                    .ok_or_else(|| anyhow::anyhow!("invalid --duration '{}': expected e.g. 45m", d))
            })
            .transpose()?;

        let cli = AnalyzeOptions {
            day: self.day,
            timezone: self.tz,
            default_duration_min,
            overlap_policy: self.policy,
        };

        let file = match FileConfig::load_for(document)? {
            Some(config) => config.into_options()?,
            None => AnalyzeOptions::default(),
        };

        Ok(merge_options(file, cli))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a plan file and report diagnostics
    Check {
        /// Plan file to analyze
        file: PathBuf,

        #[command(flatten)]
        options: AnalyzerArgs,
    },

    /// Print the resolved schedule of a plan file
    Show {
        /// Plan file to analyze
        file: PathBuf,

        #[command(flatten)]
        options: AnalyzerArgs,
    },

    /// Shift the time of one line, editing only its time token
    Shift {
        /// Plan file containing the line
        file: PathBuf,

        /// 1-based line number to shift
        line: u32,

        /// Signed offset, e.g. +15m, -1h or +1h30m
        #[arg(allow_hyphen_values = true)]
        offset: String,

        /// Write the edited line back to the file
        #[arg(long)]
        write: bool,

        #[command(flatten)]
        options: AnalyzerArgs,
    },

    /// Emit the static highlight definition
    Highlight,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("dayplan starting");

    match cli.command {
        Commands::Check { file, options } => {
            output.verbose_ctx("check", &format!("Analyzing {}", file.display()));
            check::run(&output, &file, &options)?
        }

        Commands::Show { file, options } => {
            output.verbose_ctx("show", &format!("Analyzing {}", file.display()));
            show::run(&output, &file, &options)?
        }

        Commands::Shift {
            file,
            line,
            offset,
            write,
            options,
        } => {
            output.verbose_ctx(
                "shift",
                &format!("Shifting {}:{} by {}", file.display(), line, offset),
            );
            shift_cmd::run(&output, &file, line, &offset, write, &options)?
        }

        Commands::Highlight => highlight(&output),
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Prints the highlight definition keyed off the token vocabulary
fn highlight(output: &Output) {
    let definition = editor::definition();

    if output.is_json() {
        output.data(&definition);
    } else {
        output.line(&format!("{:<18} {:<45} COLOR", "TOKEN", "SCOPE"));
        output.line(&"-".repeat(72));
        for rule in &definition.rules {
            output.line(&format!("{:<18} {:<45} {}", rule.token, rule.scope, rule.color));
        }
    }
}
