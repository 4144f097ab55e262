//! Semantic analyzer
//!
//! Walks the document once, left to right, threading a fold state (context,
//! time cursor, scheduled set) through every line and returning a
//! [`LineRecord`] per line. The fold makes the forward-only contract
//! explicit: a directive or a scheduled task can only influence lines at or
//! after its own position.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::syntax::{
    parse_duration_literal, parse_time_literal, recognize, tokenize_line, CategoryPart,
    DirectiveLine, LineShape, TaskLine, TaskPart, Token, TokenizedLine,
};

use super::context::{AnalysisContext, AnalyzeOptions, OverlapPolicy, SectionMode};
use super::diagnostic::{Diagnostic, DiagnosticCode, LineStatus};
use super::line_id::LineId;
use super::node::{CategoryPath, DirectiveNode, Node, TaskNode};

/// One analyzed line
#[derive(Debug, Clone, Serialize)]
pub struct LineRecord {
    pub id: LineId,
    pub raw: String,
    pub line_no: u32,
    pub status: LineStatus,
    pub diagnostics: Vec<Diagnostic>,
    /// Present whenever the line produced a node, even on invalid lines:
    /// malformed text is preserved in the task title rather than dropped.
    /// The status field is the authority on whether the node took part in
    /// scheduling.
    pub node: Option<Node>,
}

/// Result of a full-document analysis
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Context after the last line
    pub context: AnalysisContext,
    pub lines: Vec<LineRecord>,
}

impl Analysis {
    /// Looks up a record by 1-based line number
    pub fn line(&self, line_no: u32) -> Option<&LineRecord> {
        self.lines.get(line_no.checked_sub(1)? as usize)
    }
}

/// A committed task, kept for overlap checks against later lines
#[derive(Debug, Clone)]
struct Scheduled {
    line_no: u32,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

/// State threaded through the fold
#[derive(Debug, Clone)]
struct FoldState {
    ctx: AnalysisContext,
    /// Running default next-start-time: the end of the most recent validly
    /// scheduled task. Absent until the first valid task anchors it.
    cursor: Option<NaiveDateTime>,
    scheduled: Vec<Scheduled>,
}

/// Analyzes a whole document
///
/// A pure function of `(source, options)`: no state survives between calls
/// and identical inputs produce identical line IDs and diagnostics.
pub fn analyze(source: &str, options: &AnalyzeOptions) -> Analysis {
    let seed = FoldState {
        ctx: AnalysisContext::seed(options),
        cursor: None,
        scheduled: Vec::new(),
    };

    let mut lines = Vec::new();
    let state = source
        .lines()
        .enumerate()
        .fold(seed, |state, (idx, raw)| {
            let (state, record) = step(state, raw, idx as u32 + 1);
            lines.push(record);
            state
        });

    Analysis {
        context: state.ctx,
        lines,
    }
}

/// Analyzes one line, returning the updated fold state and its record
fn step(mut state: FoldState, raw: &str, line_no: u32) -> (FoldState, LineRecord) {
    let tok = tokenize_line(raw, line_no);
    let (shape, grammar_diags) = recognize(&tok);

    let mut diagnostics = tok.diagnostics.clone();
    diagnostics.extend(grammar_diags);

    let node = match (&shape, state.ctx.section) {
        // Section switches are the only lines with meaning inside a
        // scratchpad; everything else is inert free-form text.
        (LineShape::Directive(dir), SectionMode::Scratchpad)
            if is_section_switch(&dir.name.text) =>
        {
            apply_directive(dir, &tok, &mut state, &mut diagnostics)
        }
        (_, SectionMode::Scratchpad) => {
            diagnostics.clear();
            None
        }

        (LineShape::Blank | LineShape::CommentOnly, _) => None,
        (LineShape::Unrecognized, _) => None,
        (LineShape::Directive(dir), _) => apply_directive(dir, &tok, &mut state, &mut diagnostics),
        (LineShape::Task(task), _) => analyze_task(task, &tok, line_no, &mut state, &mut diagnostics),
    };

    let status = LineStatus::from_diagnostics(&diagnostics);

    let record = LineRecord {
        id: LineId::derive(raw, line_no),
        raw: raw.to_string(),
        line_no,
        status,
        diagnostics,
        node,
    };

    (state, record)
}

fn is_section_switch(name: &str) -> bool {
    name == "scratchpad" || name == "planner"
}

/// Validates a directive and, when the line is error-free, applies it to
/// the context
///
/// Failures surface as diagnostics on the directive's own line; a failed
/// directive changes nothing. Re-applying the same directive is
/// side-effect-stable since every application is a plain assignment.
fn apply_directive(
    dir: &DirectiveLine,
    tok: &TokenizedLine,
    state: &mut FoldState,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Node> {
    let before = diagnostics.iter().filter(|d| d.code.is_error()).count();
    let mut pending = state.ctx.clone();

    let span_of = |t: &Token| tok.original_span(t.span);
    let name = dir.name.text.as_str();

    if dir.bare && !is_section_switch(name) {
        diagnostics.push(Diagnostic::spanned(
            DiagnosticCode::BareDirective,
            format!("directive '@{}' requires a leading '-' marker", name),
            span_of(&dir.name),
        ));
    }

    match name {
        "plan" => {
            for arg in &dir.args {
                match arg.key.text.as_str() {
                    "day" => match chrono::NaiveDate::parse_from_str(&arg.value.text, "%Y-%m-%d") {
                        Ok(day) => pending.day = day,
                        Err(_) => diagnostics.push(Diagnostic::spanned(
                            DiagnosticCode::BadDay,
                            format!("malformed day '{}': expected YYYY-MM-DD", arg.value.text),
                            span_of(&arg.value),
                        )),
                    },
                    "tz" => match arg.value.text.parse::<chrono_tz::Tz>() {
                        Ok(tz) => pending.timezone = tz,
                        Err(_) => diagnostics.push(Diagnostic::spanned(
                            DiagnosticCode::BadTimezone,
                            format!("unknown timezone '{}'", arg.value.text),
                            span_of(&arg.value),
                        )),
                    },
                    other => diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::BadDirectiveArg,
                        format!("unknown argument '{}' for '@plan'", other),
                        span_of(&arg.key),
                    )),
                }
            }
        }
        "default" => {
            let mut seen = false;
            for arg in &dir.args {
                match arg.key.text.as_str() {
                    "duration" => {
                        seen = true;
                        match parse_duration_literal(&arg.value.text) {
                            Some(minutes) => pending.default_duration_min = minutes,
                            None => diagnostics.push(Diagnostic::spanned(
                                DiagnosticCode::BadDefaultDuration,
                                format!(
                                    "invalid default duration '{}': expected e.g. 45m or 1h30m",
                                    arg.value.text
                                ),
                                span_of(&arg.value),
                            )),
                        }
                    }
                    other => diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::BadDirectiveArg,
                        format!("unknown argument '{}' for '@default'", other),
                        span_of(&arg.key),
                    )),
                }
            }
            if !seen {
                diagnostics.push(Diagnostic::spanned(
                    DiagnosticCode::BadDefaultDuration,
                    "'@default' requires a duration argument".to_string(),
                    span_of(&dir.name),
                ));
            }
        }
        "overlap" => {
            let mut seen = false;
            for arg in &dir.args {
                match arg.key.text.as_str() {
                    "policy" => {
                        seen = true;
                        match arg.value.text.parse::<OverlapPolicy>() {
                            Ok(policy) => pending.overlap_policy = policy,
                            Err(message) => diagnostics.push(Diagnostic::spanned(
                                DiagnosticCode::BadPolicy,
                                message,
                                span_of(&arg.value),
                            )),
                        }
                    }
                    other => diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::BadDirectiveArg,
                        format!("unknown argument '{}' for '@overlap'", other),
                        span_of(&arg.key),
                    )),
                }
            }
            if !seen {
                diagnostics.push(Diagnostic::spanned(
                    DiagnosticCode::BadPolicy,
                    "'@overlap' requires a policy argument".to_string(),
                    span_of(&dir.name),
                ));
            }
        }
        "scratchpad" | "planner" => {
            for arg in &dir.args {
                diagnostics.push(Diagnostic::spanned(
                    DiagnosticCode::BadDirectiveArg,
                    format!("'@{}' takes no arguments", name),
                    span_of(&arg.key),
                ));
            }
            pending.section = if name == "scratchpad" {
                SectionMode::Scratchpad
            } else {
                SectionMode::Planner
            };
        }
        other => {
            diagnostics.push(Diagnostic::spanned(
                DiagnosticCode::UnknownDirective,
                format!("unknown directive '@{}'", other),
                span_of(&dir.name),
            ));
        }
    }

    let errored = diagnostics.iter().filter(|d| d.code.is_error()).count() > before;
    if errored {
        return None;
    }

    state.ctx = pending;

    Some(Node::Directive(DirectiveNode {
        name: name.to_string(),
        args: dir
            .args
            .iter()
            .map(|a| (a.key.text.clone(), a.value.text.clone()))
            .collect(),
    }))
}

/// Resolves a task line: time, duration, categories, title, overlaps
fn analyze_task(
    task: &TaskLine,
    tok: &TokenizedLine,
    line_no: u32,
    state: &mut FoldState,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Node> {
    let span_of = |t: &Token| tok.original_span(t.span);

    let mut time: Option<(NaiveTime, Token)> = None;
    let mut duration: Option<u32> = None;
    let mut categories: Vec<CategoryPath> = Vec::new();
    let mut title_parts: Vec<&str> = Vec::new();
    let mut time_errored = false;

    for part in &task.parts {
        match part {
            TaskPart::Time(t) => {
                if time.is_some() {
                    diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::UnknownToken,
                        format!("extra time '{}' treated as title text", t.text),
                        span_of(t),
                    ));
                    title_parts.push(&t.text);
                } else {
                    match parse_time_literal(&t.text) {
                        Some((value, _style)) => time = Some((value, t.clone())),
                        None => {
                            time_errored = true;
                            diagnostics.push(Diagnostic::spanned(
                                DiagnosticCode::BadTime,
                                format!("malformed time '{}'", t.text),
                                span_of(t),
                            ));
                            title_parts.push(&t.text);
                        }
                    }
                }
            }
            TaskPart::Duration(t) => {
                if duration.is_some() {
                    diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::UnknownToken,
                        format!("extra duration '{}' treated as title text", t.text),
                        span_of(t),
                    ));
                    title_parts.push(&t.text);
                } else {
                    match parse_duration_literal(&t.text) {
                        Some(minutes) => duration = Some(minutes),
                        None => {
                            diagnostics.push(Diagnostic::spanned(
                                DiagnosticCode::BadDuration,
                                format!("malformed duration '{}'", t.text),
                                span_of(t),
                            ));
                            title_parts.push(&t.text);
                        }
                    }
                }
            }
            TaskPart::Category(cat) => match resolve_category(cat) {
                Ok(path) => categories.push(path),
                Err(message) => {
                    diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::BadCategory,
                        message,
                        tok.original_span(cat.span),
                    ));
                    title_parts.push(&cat.text);
                }
            },
            TaskPart::Fragment(t) => {
                title_parts.push(&t.text);
                if let Some(diag) = classify_fragment(t, span_of(t)) {
                    diagnostics.push(diag);
                }
            }
        }
    }

    if let Some(comma) = &task.trailing_comma {
        diagnostics.push(Diagnostic::spanned(
            DiagnosticCode::TrailingComma,
            "trailing comma".to_string(),
            span_of(comma),
        ));
    }

    let (start, explicit_start) = match (&time, state.cursor) {
        (Some((value, _)), _) => (Some(state.ctx.day.and_time(*value)), true),
        (None, Some(cursor)) => (Some(cursor), false),
        (None, None) => {
            // The very first task must anchor the chain explicitly. Skipped
            // when the time token itself already errored, to avoid piling a
            // second error onto the same cause.
            if !time_errored {
                diagnostics.push(Diagnostic::new(
                    DiagnosticCode::MissingStartFirstLine,
                    "first task has no explicit start time to anchor the schedule",
                ));
            }
            (None, false)
        }
    };

    let explicit_duration = duration.is_some();
    let duration_min = duration.unwrap_or(state.ctx.default_duration_min);

    let node = TaskNode::new(
        title_parts.join(" "),
        start,
        duration_min,
        categories,
        explicit_start,
        explicit_duration,
    );

    if let (Some(start), Some(end)) = (node.start, node.end) {
        check_overlaps(start, end, &time, tok, state, diagnostics);

        let errored = diagnostics.iter().any(|d| d.code.is_error());
        if !errored {
            state.cursor = Some(end);
            state.scheduled.push(Scheduled {
                line_no,
                title: node.title.clone(),
                start,
                end,
            });
        }
    }

    Some(Node::Task(node))
}

/// Half-open interval intersection against every previously scheduled task
fn check_overlaps(
    start: NaiveDateTime,
    end: NaiveDateTime,
    time: &Option<(NaiveTime, Token)>,
    tok: &TokenizedLine,
    state: &FoldState,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let code = match state.ctx.overlap_policy {
        OverlapPolicy::Error => DiagnosticCode::OverlapError,
        OverlapPolicy::Warning => DiagnosticCode::OverlapWarning,
        OverlapPolicy::Ignore => return,
    };

    let span = time.as_ref().map(|(_, t)| tok.original_span(t.span));

    for other in &state.scheduled {
        if start < other.end && end > other.start {
            let message = format!(
                "overlaps '{}' (line {}, {}-{})",
                other.title,
                other.line_no,
                other.start.format("%H:%M"),
                other.end.format("%H:%M"),
            );
            diagnostics.push(Diagnostic {
                code,
                message,
                span,
            });
        }
    }
}

fn resolve_category(cat: &CategoryPart) -> Result<CategoryPath, String> {
    if cat.malformed {
        return Err(format!("category '{}' has an empty segment", cat.text));
    }
    CategoryPath::new(cat.segments.iter().map(|t| t.text.clone()).collect())
        .ok_or_else(|| format!("category '{}' has no segments", cat.text))
}

/// Flags title fragments that are clearly malformed literals, or odd
/// enough to warrant a warning; plain words fold in silently
fn classify_fragment(
    token: &Token,
    span: crate::syntax::Span,
) -> Option<Diagnostic> {
    let text = token.text.as_str();
    let lower = text.to_ascii_lowercase();
    let starts_numeric = text.chars().next().is_some_and(|c| c.is_ascii_digit());

    if starts_numeric && (lower.ends_with("am") || lower.ends_with("pm") || text.contains(':')) {
        return Some(Diagnostic::spanned(
            DiagnosticCode::BadTime,
            format!("malformed time '{}'", text),
            span,
        ));
    }
    if starts_numeric
        && (lower.ends_with('h') || lower.ends_with('m') || lower.ends_with("hr") || lower.ends_with("min"))
    {
        return Some(Diagnostic::spanned(
            DiagnosticCode::BadDuration,
            format!("malformed duration '{}'", text),
            span,
        ));
    }
    if token.kind == crate::syntax::TokenKind::Run || text == "=" {
        return Some(Diagnostic::spanned(
            DiagnosticCode::UnknownToken,
            format!("'{}' treated as title text", text),
            span,
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn opts() -> AnalyzeOptions {
        AnalyzeOptions {
            day: Some(NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()),
            ..Default::default()
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 26)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn task(record: &LineRecord) -> &TaskNode {
        record
            .node
            .as_ref()
            .and_then(Node::as_task)
            .unwrap_or_else(|| panic!("line {} has no task node", record.line_no))
    }

    fn codes(record: &LineRecord) -> Vec<&'static str> {
        record.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn resolves_explicit_times_and_durations() {
        let analysis = analyze("- 9am, Standup, 30m", &opts());
        let t = task(&analysis.lines[0]);

        assert_eq!(t.title, "Standup");
        assert_eq!(t.start, Some(at(9, 0)));
        assert_eq!(t.end, Some(at(9, 30)));
        assert!(t.explicit_start);
        assert!(t.explicit_duration);
    }

    #[test]
    fn implicit_start_chains_from_previous_end() {
        let analysis = analyze("- 9am, Standup, 30m\n- Review, 1h", &opts());
        let t = task(&analysis.lines[1]);

        assert_eq!(t.start, Some(at(9, 30)));
        assert_eq!(t.end, Some(at(10, 30)));
        assert!(!t.explicit_start);
    }

    #[test]
    fn default_duration_applies_when_not_written() {
        let analysis = analyze("- 9am, Standup", &opts());
        let t = task(&analysis.lines[0]);
        assert_eq!(t.duration_min, 30);
        assert!(!t.explicit_duration);
    }

    #[test]
    fn first_task_without_time_is_a_hard_error() {
        let analysis = analyze("# plan\n\n- Standup, 30m", &opts());
        let record = &analysis.lines[2];

        assert_eq!(record.status, LineStatus::Invalid);
        assert!(codes(record).contains(&"E004-missing-start-first-line"));
        // the node survives, unscheduled
        let t = task(record);
        assert_eq!(t.start, None);
        assert_eq!(t.title, "Standup");
    }

    #[test]
    fn invalid_line_does_not_advance_the_cursor() {
        let source = "- 9am, Standup, 30m\n- 25:99, Broken, 1h\n- Next";
        let analysis = analyze(source, &opts());

        assert_eq!(analysis.lines[1].status, LineStatus::Invalid);
        // Next chains from Standup's end, not from the broken line
        assert_eq!(task(&analysis.lines[2]).start, Some(at(9, 30)));
    }

    #[test]
    fn overlap_policy_matrix() {
        let base = "- 9:00, A, 1h\n- 9:30, B, 30m";

        let warn = analyze(base, &opts());
        assert!(codes(&warn.lines[1]).contains(&"W010-overlap"));
        assert_eq!(warn.lines[1].status, LineStatus::ValidWithWarnings);

        let err = analyze(&format!("- @overlap policy=error\n{}", base), &opts());
        assert!(codes(&err.lines[2]).contains(&"E013-overlap"));
        assert_eq!(err.lines[2].status, LineStatus::Invalid);

        let quiet = analyze(&format!("- @overlap policy=ignore\n{}", base), &opts());
        assert_eq!(quiet.lines[2].status, LineStatus::Valid);
    }

    #[test]
    fn overlapping_invalid_line_is_not_checked_against() {
        // B is invalid under policy=error, so C only conflicts with A
        let source = "- @overlap policy=error\n- 9:00, A, 1h\n- 9:30, B, 2h\n- 11:00, C, 30m";
        let analysis = analyze(source, &opts());

        assert_eq!(analysis.lines[2].status, LineStatus::Invalid);
        assert_eq!(analysis.lines[3].status, LineStatus::Valid);
    }

    #[test]
    fn category_paths_parse_and_validate() {
        let analysis = analyze("- 9am, Deep work, :work::focus, :home", &opts());
        let t = task(&analysis.lines[0]);
        assert_eq!(t.categories.len(), 2);
        assert_eq!(t.categories[0].segments(), &["work", "focus"]);

        let bad = analyze("- 9am, Task, :a::\n- 10am, Task2, :a:::b", &opts());
        assert!(codes(&bad.lines[0]).contains(&"E003-bad-category"));
        assert!(codes(&bad.lines[1]).contains(&"E003-bad-category"));
        assert_eq!(bad.lines[0].status, LineStatus::Invalid);
        // the malformed text is preserved in the title, not dropped
        assert_eq!(task(&bad.lines[0]).title, "Task :a::");
    }

    #[test]
    fn directives_apply_forward_only() {
        let source = "- 9am, A\n- @default duration=60m\n- 10am, B";
        let analysis = analyze(source, &opts());

        assert_eq!(task(&analysis.lines[0]).duration_min, 30);
        assert_eq!(task(&analysis.lines[2]).duration_min, 60);
        assert_eq!(analysis.context.default_duration_min, 60);
    }

    #[test]
    fn unknown_directive_is_an_error() {
        let analysis = analyze("- @frobnicate x=1", &opts());
        assert!(codes(&analysis.lines[0]).contains(&"E005-unknown-directive"));
    }

    #[test]
    fn malformed_directive_values_fail_without_applying() {
        let analysis = analyze("- @plan day=tomorrow\n- @overlap policy=loud\n- @default duration=abc", &opts());
        assert!(codes(&analysis.lines[0]).contains(&"E006-bad-day"));
        assert!(codes(&analysis.lines[1]).contains(&"E007-bad-policy"));
        assert!(codes(&analysis.lines[2]).contains(&"E008-bad-default-duration"));

        // nothing was applied
        assert_eq!(analysis.context.overlap_policy, OverlapPolicy::Warning);
        assert_eq!(analysis.context.default_duration_min, 30);
    }

    #[test]
    fn bare_directive_only_for_section_switches() {
        let analysis = analyze("@overlap policy=ignore", &opts());
        assert!(codes(&analysis.lines[0]).contains(&"E014-bare-directive"));

        let ok = analyze("@scratchpad", &opts());
        assert_eq!(ok.lines[0].status, LineStatus::Valid);
    }

    #[test]
    fn scratchpad_lines_are_inert() {
        let source = "@scratchpad\n- 9am, looks like a task, 30m\ntotal nonsense ::: here\n@planner\n- 9am, Real, 30m";
        let analysis = analyze(source, &opts());

        for record in &analysis.lines[1..3] {
            assert_eq!(record.status, LineStatus::Valid);
            assert!(record.node.is_none());
            assert!(record.diagnostics.is_empty());
        }

        // planner resumes normally and the scratchpad established no cursor
        let t = task(&analysis.lines[4]);
        assert_eq!(t.start, Some(at(9, 0)));
    }

    #[test]
    fn day_directive_moves_later_tasks_to_the_new_day() {
        let source = "- @plan day=2026-09-01\n- 9am, Task";
        let analysis = analyze(source, &opts());
        let t = task(&analysis.lines[1]);
        assert_eq!(
            t.start,
            Some(
                NaiveDate::from_ymd_opt(2026, 9, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn trailing_comma_is_a_warning() {
        let analysis = analyze("- 9am, Task, # note", &opts());
        let record = &analysis.lines[0];
        assert_eq!(record.status, LineStatus::ValidWithWarnings);
        assert!(codes(record).contains(&"W002-trailing-comma"));
        assert!(record.node.is_some(), "warnings do not withhold the node");
    }

    #[test]
    fn malformed_literals_are_errors_but_stay_in_the_title() {
        let analysis = analyze("- 9am, 90min sprint", &opts());
        let record = &analysis.lines[0];
        assert!(codes(record).contains(&"E002-bad-duration"));
        assert_eq!(record.status, LineStatus::Invalid);
        // the malformed literal is observable in the node, not just kept
        // in the raw text
        assert_eq!(task(record).title, "90min sprint");
    }

    #[test]
    fn failed_directive_lines_carry_no_node() {
        let analysis = analyze("- @frobnicate x=1", &opts());
        let record = &analysis.lines[0];
        assert_eq!(record.status, LineStatus::Invalid);
        // nothing was applied, so there is no directive node to report
        assert!(record.node.is_none());
    }

    #[test]
    fn plain_words_fold_into_title_silently() {
        let analysis = analyze("- 9am, Write report for Q3", &opts());
        let record = &analysis.lines[0];
        assert_eq!(record.status, LineStatus::Valid);
        assert_eq!(task(record).title, "Write report for Q3");
    }

    #[test]
    fn comment_and_blank_lines_are_valid_without_nodes() {
        let analysis = analyze("# heading\n\n- 9am, Task", &opts());
        assert_eq!(analysis.lines[0].status, LineStatus::Valid);
        assert!(analysis.lines[0].node.is_none());
        assert_eq!(analysis.lines[1].status, LineStatus::Valid);
    }

    #[test]
    fn missing_space_defect_still_resolves_the_task() {
        let analysis = analyze("-9am, Standup, 30m", &opts());
        let record = &analysis.lines[0];
        assert_eq!(record.status, LineStatus::ValidWithWarnings);
        assert!(codes(record).contains(&"W001-missing-space"));
        assert_eq!(task(record).start, Some(at(9, 0)));
    }

    #[test]
    fn reanalysis_is_idempotent() {
        let source = "- 9am, Standup, 30m\n- Review\n@scratchpad\nnotes\n@planner\n- 2pm, Call";
        let a = analyze(source, &opts());
        let b = analyze(source, &opts());

        let ids_a: Vec<_> = a.lines.iter().map(|l| l.id.clone()).collect();
        let ids_b: Vec<_> = b.lines.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids_a, ids_b);

        let codes_a: Vec<Vec<_>> = a.lines.iter().map(codes).collect();
        let codes_b: Vec<Vec<_>> = b.lines.iter().map(codes).collect();
        assert_eq!(codes_a, codes_b);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Identical text always yields identical IDs and diagnostics,
            /// whatever the input looks like
            #[test]
            fn analysis_is_deterministic(source in "[ -~\\n]{0,200}") {
                let a = analyze(&source, &opts());
                let b = analyze(&source, &opts());

                let view = |an: &Analysis| -> Vec<(String, Vec<&'static str>)> {
                    an.lines
                        .iter()
                        .map(|l| (l.id.to_string(), codes(l)))
                        .collect()
                };
                prop_assert_eq!(view(&a), view(&b));
            }

            /// No input aborts analysis; every line gets a record
            #[test]
            fn every_line_gets_a_record(source in "[ -~\\n]{0,200}") {
                let analysis = analyze(&source, &opts());
                prop_assert_eq!(analysis.lines.len(), source.lines().count());
            }
        }
    }
}
