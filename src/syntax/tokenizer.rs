//! Line tokenizer
//!
//! Scans one line of plan text into [`Token`]s. The scanner tolerates one
//! known formatting defect: a leading `-` marker with no following space.
//! When detected it emits a warning pointing at the exact offending column
//! of the *original* text, then tokenizes a corrected copy with a space
//! virtually inserted. Token spans therefore refer to the corrected text;
//! anything that must splice into the untouched original line (the
//! time-shift engine) maps spans back through [`TokenizedLine::original_span`].

use crate::analysis::{Diagnostic, DiagnosticCode};
use chrono::NaiveTime;

use super::token::{Span, Token, TokenKind};

/// Textual style of a clock-time literal, preserved by time-shift rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// `9am` - hour only, 12-hour with meridiem
    BareHour,
    /// `9:15am` - 12-hour with minutes and meridiem
    HourMinute,
    /// `14:30` - 24-hour
    Military,
    /// `noon` / `midnight`
    Named,
}

/// Result of tokenizing one line
#[derive(Debug, Clone)]
pub struct TokenizedLine {
    /// Tokens in scan order, terminated by an `Eol` token
    pub tokens: Vec<Token>,
    /// Line-local diagnostics, spans in original-text offsets
    pub diagnostics: Vec<Diagnostic>,
    /// The text the tokens were scanned from (original, or original with a
    /// virtually inserted space after the marker)
    pub corrected: String,
    /// Byte offset in `corrected` where a space was inserted, if any
    pub inserted_space_at: Option<usize>,
}

impl TokenizedLine {
    /// Maps a span in corrected-text offsets back to the original line
    pub fn original_span(&self, span: Span) -> Span {
        match self.inserted_space_at {
            Some(at) => {
                let back = |off: usize| if off > at { off - 1 } else { off };
                Span::new(back(span.start), back(span.end))
            }
            None => span,
        }
    }
}

/// Tokenizes a single line (without its terminator)
pub fn tokenize_line(raw: &str, line_no: u32) -> TokenizedLine {
    let mut diagnostics = Vec::new();

    let (corrected, inserted_space_at) = correct_marker_spacing(raw, line_no, &mut diagnostics);

    let mut tokens = Vec::new();
    let text = corrected.as_str();
    let mut chars = text.char_indices().peekable();

    while let Some(&(at, c)) = chars.peek() {
        if c == ' ' || c == '\t' {
            chars.next();
            continue;
        }

        match c {
            '-' if tokens.is_empty() => {
                chars.next();
                tokens.push(Token::new(TokenKind::Marker, "-", Span::new(at, at + 1), line_no));
            }
            '@' => {
                chars.next();
                tokens.push(Token::new(
                    TokenKind::DirectiveMarker,
                    "@",
                    Span::new(at, at + 1),
                    line_no,
                ));
            }
            '#' => {
                let rest = &text[at..];
                tokens.push(Token::new(
                    TokenKind::Comment,
                    rest,
                    Span::new(at, text.len()),
                    line_no,
                ));
                break;
            }
            ',' => {
                chars.next();
                tokens.push(Token::new(TokenKind::Comma, ",", Span::new(at, at + 1), line_no));
            }
            '=' => {
                chars.next();
                tokens.push(Token::new(TokenKind::Equals, "=", Span::new(at, at + 1), line_no));
            }
            ':' => {
                chars.next();
                if let Some(&(_, ':')) = chars.peek() {
                    chars.next();
                    tokens.push(Token::new(TokenKind::PathSep, "::", Span::new(at, at + 2), line_no));
                } else {
                    tokens.push(Token::new(TokenKind::PathStart, ":", Span::new(at, at + 1), line_no));
                }
            }
            c if c.is_control() => {
                chars.next();
                let span = Span::new(at, at + c.len_utf8());
                diagnostics.push(Diagnostic::spanned(
                    DiagnosticCode::BadChar,
                    format!("unrecognized character {:?}", c),
                    original_span(span, inserted_space_at),
                ));
            }
            _ => {
                let (span, run) = scan_run(text, at, &mut chars);
                tokens.push(Token::new(classify_run(run), run, span, line_no));
            }
        }
    }

    tokens.push(Token::new(
        TokenKind::Eol,
        "",
        Span::new(text.len(), text.len()),
        line_no,
    ));

    TokenizedLine {
        tokens,
        diagnostics,
        corrected,
        inserted_space_at,
    }
}

/// Detects a marker with no following space, warns at the original column
/// and returns the corrected text
fn correct_marker_spacing(
    raw: &str,
    _line_no: u32,
    diagnostics: &mut Vec<Diagnostic>,
) -> (String, Option<usize>) {
    let indent = raw.len() - raw.trim_start_matches([' ', '\t']).len();
    let rest = &raw[indent..];

    let mut it = rest.chars();
    if it.next() == Some('-') {
        if let Some(next) = it.next() {
            if next != ' ' && next != '\t' {
                let at = indent + 1;
                diagnostics.push(Diagnostic::spanned(
                    DiagnosticCode::MissingSpace,
                    format!("missing space after '-' marker at column {}", at + 1),
                    Span::new(at, at + next.len_utf8()),
                ));
                let mut corrected = String::with_capacity(raw.len() + 1);
                corrected.push_str(&raw[..at]);
                corrected.push(' ');
                corrected.push_str(&raw[at..]);
                return (corrected, Some(at));
            }
        }
    }

    (raw.to_string(), None)
}

fn original_span(span: Span, inserted_space_at: Option<usize>) -> Span {
    match inserted_space_at {
        Some(at) => {
            let back = |off: usize| if off > at { off - 1 } else { off };
            Span::new(back(span.start), back(span.end))
        }
        None => span,
    }
}

/// Consumes a non-separator run starting at `start`
///
/// A `:` is folded into the run only while the run so far is all digits and
/// a digit follows, so `9:15am` and `14:30` scan as one token while `:work`
/// still opens a category path.
fn scan_run<'a>(
    text: &'a str,
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> (Span, &'a str) {
    let mut end = start;

    while let Some(&(at, c)) = chars.peek() {
        let run_so_far = &text[start..at];
        let take = match c {
            ' ' | '\t' | ',' | '=' | '#' => false,
            ':' => {
                let digits_so_far =
                    !run_so_far.is_empty() && run_so_far.bytes().all(|b| b.is_ascii_digit());
                let digit_next = text[at + 1..].chars().next().is_some_and(|n| n.is_ascii_digit());
                digits_so_far && digit_next
            }
            c if c.is_control() => false,
            _ => true,
        };

        if !take {
            break;
        }
        chars.next();
        end = at + c.len_utf8();
    }

    (Span::new(start, end), &text[start..end])
}

/// Classifies a run, trying duration shapes before clock-time shapes
fn classify_run(text: &str) -> TokenKind {
    if duration_shape(text) {
        TokenKind::Duration
    } else if clock_shape(text) {
        TokenKind::ClockTime
    } else if text.eq_ignore_ascii_case("noon") || text.eq_ignore_ascii_case("midnight") {
        TokenKind::NamedTime
    } else if text
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '\'' || c == '-')
    {
        TokenKind::Word
    } else {
        TokenKind::Run
    }
}

/// Shape check for duration literals: `Nh`, `Nm`, `NhNm`
fn duration_shape(text: &str) -> bool {
    split_duration(text).is_some()
}

/// Shape check for clock-time literals: `H(am|pm)`, `H:MM(am|pm)`, `HH:MM`
///
/// Shape only - out-of-range values like `25:99` still classify as a
/// clock-time token and fail later with a bad-time diagnostic.
fn clock_shape(text: &str) -> bool {
    split_clock(text).is_some()
}

fn split_duration(text: &str) -> Option<(u32, u32)> {
    let lower = text.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut hours = None;
    let mut minutes = None;

    if let Some(at) = rest.find('h') {
        let digits = &rest[..at];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        hours = Some(digits.parse::<u32>().ok()?);
        rest = &rest[at + 1..];
    }

    if let Some(digits) = rest.strip_suffix('m') {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        minutes = Some(digits.parse::<u32>().ok()?);
        rest = "";
    }

    if !rest.is_empty() || (hours.is_none() && minutes.is_none()) {
        return None;
    }

    Some((hours.unwrap_or(0), minutes.unwrap_or(0)))
}

fn split_clock(text: &str) -> Option<(u32, u32, TimeStyle)> {
    let lower = text.to_ascii_lowercase();

    let (body, meridiem) = if let Some(b) = lower.strip_suffix("am") {
        (b, Some(false))
    } else if let Some(b) = lower.strip_suffix("pm") {
        (b, Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (hour_part, minute_part) = match body.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (body, None),
    };

    if hour_part.is_empty()
        || hour_part.len() > 2
        || !hour_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    if let Some(m) = minute_part {
        if m.len() != 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    // Bare `9` is a plain number, not a time; 24-hour times need minutes.
    if meridiem.is_none() && minute_part.is_none() {
        return None;
    }

    let hour: u32 = hour_part.parse().ok()?;
    let minute: u32 = minute_part.map_or(Ok(0), str::parse).ok()?;

    let style = match (meridiem, minute_part) {
        (Some(_), None) => TimeStyle::BareHour,
        (Some(_), Some(_)) => TimeStyle::HourMinute,
        (None, _) => TimeStyle::Military,
    };

    let hour = match meridiem {
        Some(pm) => {
            let h12 = hour;
            // hour24 computed here so range errors surface as a single None
            match (h12, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            }
        }
        None => hour,
    };

    Some((hour, minute, style))
}

/// Parses a duration literal to minutes, rejecting zero and out-of-range
/// values the shape check lets through
pub fn parse_duration_literal(text: &str) -> Option<u32> {
    let (hours, minutes) = split_duration(text)?;
    let total = hours.checked_mul(60)?.checked_add(minutes)?;
    if total == 0 || minutes >= 60 && hours > 0 {
        return None;
    }
    Some(total)
}

/// Parses a clock-time or named-time literal into a wall-clock time plus
/// the style it was written in
pub fn parse_time_literal(text: &str) -> Option<(NaiveTime, TimeStyle)> {
    if text.eq_ignore_ascii_case("noon") {
        return Some((NaiveTime::from_hms_opt(12, 0, 0)?, TimeStyle::Named));
    }
    if text.eq_ignore_ascii_case("midnight") {
        return Some((NaiveTime::from_hms_opt(0, 0, 0)?, TimeStyle::Named));
    }

    let (hour, minute, style) = split_clock(text)?;
    if style != TimeStyle::Military {
        // meridiem forms: the written hour must have been 1-12
        let written = {
            let lower = text.to_ascii_lowercase();
            let body = lower.trim_end_matches("am").trim_end_matches("pm");
            let h = body.split(':').next().unwrap_or("");
            h.parse::<u32>().ok()?
        };
        if !(1..=12).contains(&written) {
            return None;
        }
    }
    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| (t, style))
}
