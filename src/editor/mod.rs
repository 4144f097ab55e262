//! Editor collaborators
//!
//! External consumers of the core pipeline: a static highlight-definition
//! generator keyed off the token vocabulary, and a façade deriving
//! completions, hover text and quick-fixes from analysis results.

pub mod features;
pub mod highlight;

pub use features::{completions, hover, quick_fixes, CompletionItem, QuickFix};
pub use highlight::{definition, HighlightDefinition, HighlightRule};
