//! Editor-feature façade
//!
//! Thin, read-only helpers deriving completions, hover text and quick-fix
//! edits purely from analyzed [`LineRecord`]s. No analysis state of its
//! own and no mutation of the document.

use crate::analysis::{DiagnosticCode, LineRecord, Node};

/// One completion entry
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub detail: String,
}

/// Directive names, argument keys and enum values matching a prefix
pub fn completions(prefix: &str) -> Vec<CompletionItem> {
    const ENTRIES: &[(&str, &str)] = &[
        ("@plan", "configure day and timezone (day=YYYY-MM-DD, tz=Area/City)"),
        ("@default", "set the default task duration (duration=45m)"),
        ("@overlap", "set the overlap policy (policy=error|warning|ignore)"),
        ("@scratchpad", "switch to scratchpad mode: lines below are inert"),
        ("@planner", "switch back to planner mode"),
        ("day=", "day for @plan, YYYY-MM-DD"),
        ("tz=", "timezone for @plan, e.g. Europe/Paris"),
        ("duration=", "duration for @default, e.g. 45m or 1h30m"),
        ("policy=error", "overlapping tasks are errors"),
        ("policy=warning", "overlapping tasks are warnings"),
        ("policy=ignore", "overlaps are not reported"),
    ];

    ENTRIES
        .iter()
        .filter(|(label, _)| label.starts_with(prefix))
        .map(|(label, detail)| CompletionItem {
            label: (*label).to_string(),
            detail: (*detail).to_string(),
        })
        .collect()
}

/// Renders hover text for a line, when it has something to say
pub fn hover(record: &LineRecord) -> Option<String> {
    match record.node.as_ref()? {
        Node::Task(task) => {
            let mut text = format!("**{}**", task.title);
            if let (Some(start), Some(end)) = (task.start, task.end) {
                text.push_str(&format!(
                    "\n{} - {} ({}m{})",
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    task.duration_min,
                    if task.explicit_duration { "" } else { ", default" },
                ));
                if !task.explicit_start {
                    text.push_str("\nstart inherited from the previous task");
                }
            }
            for category in &task.categories {
                text.push_str(&format!("\n{}", category));
            }
            Some(text)
        }
        Node::Directive(directive) => {
            let mut text = format!("directive **@{}**", directive.name);
            for (key, value) in &directive.args {
                text.push_str(&format!("\n{} = {}", key, value));
            }
            Some(text)
        }
    }
}

/// A single-line replacement edit
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct QuickFix {
    pub title: String,
    pub new_line_text: String,
}

/// Derives quick-fix edits from a line's diagnostics
pub fn quick_fixes(record: &LineRecord) -> Vec<QuickFix> {
    let mut fixes = Vec::new();

    for diagnostic in &record.diagnostics {
        match diagnostic.code {
            DiagnosticCode::MissingSpace => {
                if let Some(span) = diagnostic.span {
                    let mut fixed = record.raw.clone();
                    if span.start <= fixed.len() {
                        fixed.insert(span.start, ' ');
                        fixes.push(QuickFix {
                            title: "insert space after '-'".to_string(),
                            new_line_text: fixed,
                        });
                    }
                }
            }
            DiagnosticCode::TrailingComma => {
                if let Some(span) = diagnostic.span {
                    if record.raw.get(span.start..span.end) == Some(",") {
                        let mut fixed = record.raw.clone();
                        fixed.remove(span.start);
                        fixes.push(QuickFix {
                            title: "remove trailing comma".to_string(),
                            new_line_text: fixed,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fixes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalyzeOptions};
    use chrono::NaiveDate;

    fn analyzed(source: &str) -> Vec<LineRecord> {
        let options = AnalyzeOptions {
            day: Some(NaiveDate::from_ymd_opt(2026, 8, 26).unwrap()),
            ..Default::default()
        };
        analyze(source, &options).lines
    }

    #[test]
    fn completions_filter_by_prefix() {
        let all = completions("");
        assert!(all.len() >= 5);

        let directives = completions("@");
        assert!(directives.iter().all(|c| c.label.starts_with('@')));
        assert!(directives.iter().any(|c| c.label == "@scratchpad"));

        let policies = completions("policy=");
        assert_eq!(policies.len(), 3);
    }

    #[test]
    fn hover_describes_a_resolved_task() {
        let lines = analyzed("- 9am, Standup, 30m, :work::meetings");
        let text = hover(&lines[0]).unwrap();
        assert!(text.contains("Standup"));
        assert!(text.contains("09:00 - 09:30"));
        assert!(text.contains(":work::meetings"));
    }

    #[test]
    fn hover_is_empty_for_comment_lines() {
        let lines = analyzed("# nothing here");
        assert_eq!(hover(&lines[0]), None);
    }

    #[test]
    fn missing_space_fix_restores_the_space() {
        let lines = analyzed("-9am, Task");
        let fixes = quick_fixes(&lines[0]);
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].new_line_text, "- 9am, Task");
    }

    #[test]
    fn trailing_comma_fix_removes_the_comma() {
        let lines = analyzed("- 9am, Task, # note");
        let fixes = quick_fixes(&lines[0]);
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].new_line_text, "- 9am, Task # note");
    }

    #[test]
    fn clean_lines_offer_no_fixes() {
        let lines = analyzed("- 9am, Task");
        assert!(quick_fixes(&lines[0]).is_empty());
    }
}
