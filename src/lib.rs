//! dayplan - a plain-text day planner
//!
//! Turns line-oriented day-planning text into a validated schedule: each
//! line becomes a task (with resolved start/end/duration/categories) or a
//! configuration directive, annotated with precise diagnostics. A
//! text-preserving time-shift engine edits a single line's time in place.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod editor;
pub mod shift;
pub mod syntax;

pub use analysis::{analyze, Analysis, AnalyzeOptions, LineRecord, LineStatus};
pub use shift::{shift, shift_batch, ShiftError, ShiftOutcome};
