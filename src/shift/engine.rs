//! Time-shift engine
//!
//! Edits the time portion of one analyzed line in place, leaving every
//! other byte of the original text untouched. The engine never trusts the
//! analyzer's spans: it re-tokenizes the raw line and maps spans back to
//! the original, unmodified text before splicing, so the virtually
//! corrected copy used by analysis can never cause span drift here.

use chrono::Duration;
use thiserror::Error;

use crate::analysis::{Analysis, LineId, LineStatus, Node, TaskNode};
use crate::syntax::{parse_time_literal, tokenize_line, TimeStyle, Token, TokenKind};

use super::offset::{OffsetError, ShiftOffset};

#[derive(Debug, Error, PartialEq)]
pub enum ShiftError {
    #[error(transparent)]
    Offset(#[from] OffsetError),

    #[error("no line {0} in the analyzed document")]
    NoSuchLine(u32),

    #[error("line {0} is not a valid task line")]
    NotATask(u32),

    #[error("could not locate the time token on line {0}")]
    TimeTokenNotFound(u32),
}

/// Result of one successful shift
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftOutcome {
    pub line_no: u32,
    /// The edited line; all bytes outside the time portion are identical
    /// to the original
    pub new_line_text: String,
    /// Downstream implicit-start task lines whose resolved times are now
    /// stale. Advisory only: a full re-analysis yields their new instants.
    pub affected_line_ids: Vec<LineId>,
}

/// Shifts the time of one line by a signed offset
///
/// The edit is computed against the analysis snapshot; no text is mutated
/// on failure.
pub fn shift(analysis: &Analysis, line_no: u32, offset_text: &str) -> Result<ShiftOutcome, ShiftError> {
    let offset: ShiftOffset = offset_text.parse()?;

    let record = analysis
        .line(line_no)
        .ok_or(ShiftError::NoSuchLine(line_no))?;
    // Invalid lines keep their node for display, but an unscheduled time
    // cannot be shifted.
    if record.status == LineStatus::Invalid {
        return Err(ShiftError::NotATask(line_no));
    }
    let task = record
        .node
        .as_ref()
        .and_then(Node::as_task)
        .ok_or(ShiftError::NotATask(line_no))?;

    let new_line_text = if task.explicit_start {
        shift_explicit(&record.raw, line_no, offset)?
    } else {
        insert_shifted_start(&record.raw, line_no, task, offset)?
    };

    Ok(ShiftOutcome {
        line_no,
        new_line_text,
        affected_line_ids: affected_lines(analysis, line_no),
    })
}

/// Applies several shifts independently against one immutable snapshot
///
/// Results are merged by line number; one line's failure does not block
/// the others and no cross-line atomicity is implied.
pub fn shift_batch(
    analysis: &Analysis,
    requests: &[(u32, String)],
) -> Vec<(u32, Result<ShiftOutcome, ShiftError>)> {
    let mut results: Vec<_> = requests
        .iter()
        .map(|(line_no, offset)| (*line_no, shift(analysis, *line_no, offset)))
        .collect();
    results.sort_by_key(|(line_no, _)| *line_no);
    results
}

/// Re-locates the explicit time token in the original text and splices the
/// shifted rendering over it
fn shift_explicit(raw: &str, line_no: u32, offset: ShiftOffset) -> Result<String, ShiftError> {
    let tok = tokenize_line(raw, line_no);
    let token = tok
        .tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::ClockTime | TokenKind::NamedTime))
        .ok_or(ShiftError::TimeTokenNotFound(line_no))?;

    let (time, style) = parse_time_literal(&token.text)
        .ok_or(ShiftError::TimeTokenNotFound(line_no))?;

    let shifted = add_wrapping(minutes_of_day(time), offset.minutes());
    let rendered = render_time(shifted, style);

    let span = tok.original_span(token.span);
    let mut edited = String::with_capacity(raw.len());
    edited.push_str(&raw[..span.start]);
    edited.push_str(&rendered);
    edited.push_str(&raw[span.end..]);
    Ok(edited)
}

/// Inserts a freshly rendered start time right after the marker of a line
/// that inherited its start from the cursor
fn insert_shifted_start(
    raw: &str,
    line_no: u32,
    task: &TaskNode,
    offset: ShiftOffset,
) -> Result<String, ShiftError> {
    let start = task.start.ok_or(ShiftError::TimeTokenNotFound(line_no))?;
    let shifted = start + Duration::minutes(i64::from(offset.minutes()));
    let rendered = render_time(minutes_of_day(shifted.time()), TimeStyle::HourMinute);

    let tok = tokenize_line(raw, line_no);
    let marker: &Token = tok
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Marker)
        .ok_or(ShiftError::NotATask(line_no))?;
    let at = tok.original_span(marker.span).end;

    let mut edited = String::with_capacity(raw.len() + rendered.len() + 2);
    edited.push_str(&raw[..at]);
    edited.push(' ');
    edited.push_str(&rendered);
    edited.push(',');
    edited.push_str(&raw[at..]);
    Ok(edited)
}

/// Collects the ids of consecutive downstream task lines lacking an
/// explicit start, stopping at (excluding) the first task line that has
/// one. Non-task lines neither join nor terminate the run.
fn affected_lines(analysis: &Analysis, line_no: u32) -> Vec<LineId> {
    let mut affected = Vec::new();
    for record in analysis
        .lines
        .iter()
        .filter(|l| l.line_no > line_no && l.status != LineStatus::Invalid)
    {
        if let Some(task) = record.node.as_ref().and_then(Node::as_task) {
            if task.explicit_start {
                break;
            }
            affected.push(record.id.clone());
        }
    }
    affected
}

fn minutes_of_day(time: chrono::NaiveTime) -> i32 {
    use chrono::Timelike;
    (time.hour() * 60 + time.minute()) as i32
}

/// Minute arithmetic with 24-hour wraparound in both directions
fn add_wrapping(minutes: i32, delta: i32) -> i32 {
    (minutes + delta).rem_euclid(24 * 60)
}

/// Renders a wall-clock value in the same textual style the original
/// token used
///
/// A bare hour keeps its bare form while the minutes stay zero and
/// promotes to hour:minute otherwise. The named words render only when the
/// result lands exactly on 12:00 or 00:00; any other value falls back to
/// the 12-hour hour:minute form.
fn render_time(minutes_of_day: i32, style: TimeStyle) -> String {
    let hour = minutes_of_day / 60;
    let minute = minutes_of_day % 60;

    let (h12, meridiem) = match hour {
        0 => (12, "am"),
        12 => (12, "pm"),
        h if h > 12 => (h - 12, "pm"),
        h => (h, "am"),
    };

    match style {
        TimeStyle::Military => format!("{:02}:{:02}", hour, minute),
        TimeStyle::BareHour if minute == 0 => format!("{}{}", h12, meridiem),
        TimeStyle::Named if hour == 12 && minute == 0 => "noon".to_string(),
        TimeStyle::Named if hour == 0 && minute == 0 => "midnight".to_string(),
        _ => format!("{}:{:02}{}", h12, minute, meridiem),
    }
}
