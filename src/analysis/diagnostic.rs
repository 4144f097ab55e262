//! Diagnostics and line status
//!
//! Diagnostic codes form a closed, versioned vocabulary. The rendered code
//! strings (`E001-bad-time`, `W010-overlap`, ...) are a public contract:
//! consumers branch on the literal string, so codes are append-only and
//! never renumbered. Severity is carried by the prefix - `E` marks its line
//! invalid, `W` never blocks scheduling.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::syntax::Span;

/// Diagnostic severity, derived from the code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Closed set of diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    BadTime,
    BadDuration,
    BadCategory,
    MissingStartFirstLine,
    UnknownDirective,
    BadDay,
    BadPolicy,
    BadDefaultDuration,
    BadDirectiveArg,
    BadChar,
    MalformedKeyValue,
    UnterminatedPath,
    OverlapError,
    BareDirective,
    BadTimezone,
    UnrecognizedLine,
    MissingSpace,
    TrailingComma,
    UnknownToken,
    OverlapWarning,
}

impl DiagnosticCode {
    /// Stable wire string for this code
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::BadTime => "E001-bad-time",
            DiagnosticCode::BadDuration => "E002-bad-duration",
            DiagnosticCode::BadCategory => "E003-bad-category",
            DiagnosticCode::MissingStartFirstLine => "E004-missing-start-first-line",
            DiagnosticCode::UnknownDirective => "E005-unknown-directive",
            DiagnosticCode::BadDay => "E006-bad-day",
            DiagnosticCode::BadPolicy => "E007-bad-policy",
            DiagnosticCode::BadDefaultDuration => "E008-bad-default-duration",
            DiagnosticCode::BadDirectiveArg => "E009-bad-directive-arg",
            DiagnosticCode::BadChar => "E010-bad-char",
            DiagnosticCode::MalformedKeyValue => "E011-malformed-keyvalue",
            DiagnosticCode::UnterminatedPath => "E012-unterminated-path",
            DiagnosticCode::OverlapError => "E013-overlap",
            DiagnosticCode::BareDirective => "E014-bare-directive",
            DiagnosticCode::BadTimezone => "E015-bad-timezone",
            DiagnosticCode::UnrecognizedLine => "E016-unrecognized-line",
            DiagnosticCode::MissingSpace => "W001-missing-space",
            DiagnosticCode::TrailingComma => "W002-trailing-comma",
            DiagnosticCode::UnknownToken => "W003-unknown-token",
            DiagnosticCode::OverlapWarning => "W010-overlap",
        }
    }

    pub fn severity(&self) -> Severity {
        if self.as_str().starts_with('E') {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One finding attached to a line
///
/// The span is best-effort, in byte offsets of the original raw line;
/// `None` means the whole line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
        }
    }

    pub fn spanned(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Validation status of a line, derived purely from its diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStatus {
    Valid,
    ValidWithWarnings,
    Invalid,
}

impl LineStatus {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        if diagnostics.iter().any(|d| d.code.is_error()) {
            LineStatus::Invalid
        } else if !diagnostics.is_empty() {
            LineStatus::ValidWithWarnings
        } else {
            LineStatus::Valid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Valid => "valid",
            LineStatus::ValidWithWarnings => "valid-with-warnings",
            LineStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
