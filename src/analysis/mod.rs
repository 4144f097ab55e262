//! Semantic analysis of plan documents
//!
//! Contains the core model (diagnostics, nodes, line identifiers, the
//! analysis context) and the per-line fold that turns tokenized lines into
//! validated [`LineRecord`]s.

mod analyzer;
mod context;
mod diagnostic;
mod line_id;
mod node;

pub use analyzer::{analyze, Analysis, LineRecord};
pub use context::{AnalysisContext, AnalyzeOptions, OverlapPolicy, SectionMode};
pub use diagnostic::{Diagnostic, DiagnosticCode, LineStatus, Severity};
pub use line_id::{IdError, LineId};
pub use node::{CategoryPath, DirectiveNode, Node, TaskNode};
