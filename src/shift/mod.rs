//! Text-preserving time-shift mutation
//!
//! Consumes an [`crate::analysis::Analysis`] snapshot plus the tokenizer to
//! re-locate time tokens in raw text, and edits a single line's time in
//! place without touching any other byte.

mod engine;
mod offset;

pub use engine::{shift, shift_batch, ShiftError, ShiftOutcome};
pub use offset::{OffsetError, ShiftOffset};
