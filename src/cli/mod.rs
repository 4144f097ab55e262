//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `check` | Analyze a plan file, print diagnostics |
//! | `show` | Print the resolved schedule |
//! | `shift` | Move one line's time in place |
//! | `highlight` | Emit the static highlight definition |
//!
//! All commands support `--format text` (default) and `--format json`,
//! plus `--verbose` for debug output on stderr. Call [`run()`] to parse
//! arguments and execute the appropriate command.

mod app;
mod check;
mod output;
mod shift_cmd;
mod show;

pub use app::{run, AnalyzerArgs, Cli, Commands};
pub use output::{Output, OutputFormat};
