//! Token vocabulary for plan lines
//!
//! Every downstream stage (grammar, analyzer, time-shift splicing, the
//! highlight table) works off this closed set of token kinds. Offsets are
//! byte offsets into the line the token was scanned from.

use serde::Serialize;
use std::fmt;

/// Byte span within a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Token kinds
///
/// Literal classification precedence is fixed in the tokenizer: duration
/// patterns are tried before clock-time patterns, so `30m` is never read
/// as a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// Leading `-` that opens a task or directive line
    Marker,
    /// `@` introducing a directive name
    DirectiveMarker,
    /// `,` separating task parts
    Comma,
    /// `=` between a directive argument key and value
    Equals,
    /// `:` opening a category path
    PathStart,
    /// `::` separating category path segments
    PathSep,
    /// `#` to end of line
    Comment,
    /// Duration literal (`30m`, `2h`, `1h30m`)
    Duration,
    /// Clock-time literal (`9am`, `9:15am`, `14:30`)
    ClockTime,
    /// `noon` or `midnight`
    NamedTime,
    /// Bare identifier-like run (letters, digits, `_`, `'`, `-`)
    Word,
    /// Any other non-separator run
    Run,
    /// End of line
    Eol,
}

impl TokenKind {
    /// Stable name used in JSON output and the highlight definition
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Marker => "marker",
            TokenKind::DirectiveMarker => "directive-marker",
            TokenKind::Comma => "comma",
            TokenKind::Equals => "equals",
            TokenKind::PathStart => "path-start",
            TokenKind::PathSep => "path-sep",
            TokenKind::Comment => "comment",
            TokenKind::Duration => "duration",
            TokenKind::ClockTime => "clock-time",
            TokenKind::NamedTime => "named-time",
            TokenKind::Word => "word",
            TokenKind::Run => "run",
            TokenKind::Eol => "eol",
        }
    }

    /// All kinds, in a fixed order (drives the highlight table)
    pub fn all() -> &'static [TokenKind] {
        &[
            TokenKind::Marker,
            TokenKind::DirectiveMarker,
            TokenKind::Comma,
            TokenKind::Equals,
            TokenKind::PathStart,
            TokenKind::PathSep,
            TokenKind::Comment,
            TokenKind::Duration,
            TokenKind::ClockTime,
            TokenKind::NamedTime,
            TokenKind::Word,
            TokenKind::Run,
            TokenKind::Eol,
        ]
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its text and location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Span in the line the token was scanned from
    pub span: Span,
    /// 1-based owning line number
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_covers_both() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        assert_eq!(a.merge(&b), Span::new(2, 9));
    }

    #[test]
    fn kind_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for kind in TokenKind::all() {
            assert!(seen.insert(kind.name()), "duplicate name: {}", kind);
        }
    }
}
