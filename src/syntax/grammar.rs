//! Line-shape recognizer
//!
//! Confirms a tokenized line matches one of the closed set of legal shapes:
//! marker-led (directive or order-free task parts), bare directive,
//! comment-only, or blank. Purely syntactic - it knows nothing about time
//! inference or section modes, and its errors (malformed key=value,
//! unterminated path, unrecognized shape) are independent of meaning.

use crate::analysis::{Diagnostic, DiagnosticCode};

use super::token::{Span, Token, TokenKind};
use super::tokenizer::TokenizedLine;

/// Shape of one line
#[derive(Debug, Clone)]
pub enum LineShape {
    Blank,
    CommentOnly,
    Directive(DirectiveLine),
    Task(TaskLine),
    /// No legal shape matched; inert in scratchpad, an error in planner mode
    Unrecognized,
}

/// A directive line: `@name key=value ...`, optionally behind a marker
#[derive(Debug, Clone)]
pub struct DirectiveLine {
    /// True when the line has no leading `-` marker
    pub bare: bool,
    pub name: Token,
    pub args: Vec<DirectiveArg>,
}

/// One `key=value` directive argument
#[derive(Debug, Clone)]
pub struct DirectiveArg {
    pub key: Token,
    pub value: Token,
}

/// A marker-led task line, decomposed into order-free parts
#[derive(Debug, Clone)]
pub struct TaskLine {
    pub parts: Vec<TaskPart>,
    /// Comma sitting directly before the comment or end of line
    pub trailing_comma: Option<Token>,
    pub comment: Option<Token>,
}

/// One comma-separated task part
#[derive(Debug, Clone)]
pub enum TaskPart {
    /// Clock-time or named-time literal
    Time(Token),
    Duration(Token),
    Category(CategoryPart),
    /// Anything else - falls through to the title
    Fragment(Token),
}

/// A category path run (`:work::deep`), possibly structurally malformed
#[derive(Debug, Clone)]
pub struct CategoryPart {
    /// Span of the whole run in corrected-text offsets
    pub span: Span,
    /// Literal text of the run
    pub text: String,
    pub segments: Vec<Token>,
    /// True when the run contains an empty segment (`:a::`, `:a:::b`)
    pub malformed: bool,
}

/// Recognizes the shape of one tokenized line
pub fn recognize(line: &TokenizedLine) -> (LineShape, Vec<Diagnostic>) {
    let tokens: Vec<&Token> = line
        .tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eol)
        .collect();

    let mut diagnostics = Vec::new();

    let shape = match tokens.first().map(|t| t.kind) {
        None => LineShape::Blank,
        Some(TokenKind::Comment) => LineShape::CommentOnly,
        Some(TokenKind::Marker) => match tokens.get(1).map(|t| t.kind) {
            Some(TokenKind::DirectiveMarker) => {
                directive_line(&tokens[1..], false, &mut diagnostics)
            }
            _ => task_line(&tokens[1..], &mut diagnostics),
        },
        Some(TokenKind::DirectiveMarker) => directive_line(&tokens, true, &mut diagnostics),
        Some(_) => {
            let span = tokens
                .iter()
                .map(|t| t.span)
                .reduce(|a, b| a.merge(&b))
                .unwrap_or_default();
            diagnostics.push(Diagnostic::spanned(
                DiagnosticCode::UnrecognizedLine,
                "line is not a task, directive, comment or blank line".to_string(),
                span,
            ));
            LineShape::Unrecognized
        }
    };

    // Grammar works on corrected-text offsets; reported spans always refer
    // to the original line.
    for d in &mut diagnostics {
        if let Some(s) = d.span {
            d.span = Some(line.original_span(s));
        }
    }

    (shape, diagnostics)
}

/// Parses `@name key=value ...` starting at the directive marker
fn directive_line(
    tokens: &[&Token],
    bare: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> LineShape {
    debug_assert_eq!(tokens[0].kind, TokenKind::DirectiveMarker);

    let name = match tokens.get(1) {
        Some(t) if t.kind == TokenKind::Word => (*t).clone(),
        other => {
            let span = other.map_or(tokens[0].span, |t| t.span);
            diagnostics.push(Diagnostic::spanned(
                DiagnosticCode::UnrecognizedLine,
                "expected a directive name after '@'".to_string(),
                span,
            ));
            return LineShape::Unrecognized;
        }
    };

    let mut args = Vec::new();
    let mut rest = tokens[2..].iter().peekable();

    while let Some(&tok) = rest.peek() {
        match tok.kind {
            TokenKind::Comma => {
                rest.next();
            }
            TokenKind::Comment => break,
            TokenKind::Word => {
                let key = (*tok).clone();
                rest.next();

                let eq = rest.peek().filter(|t| t.kind == TokenKind::Equals);
                if eq.is_none() {
                    diagnostics.push(Diagnostic::spanned(
                        DiagnosticCode::MalformedKeyValue,
                        format!("expected '=' after argument key '{}'", key.text),
                        key.span,
                    ));
                    continue;
                }
                rest.next();

                match rest.peek() {
                    Some(value) if is_value_kind(value.kind) => {
                        args.push(DirectiveArg {
                            key,
                            value: (**value).clone(),
                        });
                        rest.next();
                    }
                    _ => {
                        diagnostics.push(Diagnostic::spanned(
                            DiagnosticCode::MalformedKeyValue,
                            format!("expected a value after '{}='", key.text),
                            key.span,
                        ));
                    }
                }
            }
            _ => {
                diagnostics.push(Diagnostic::spanned(
                    DiagnosticCode::MalformedKeyValue,
                    format!("unexpected '{}' in directive arguments", tok.text),
                    tok.span,
                ));
                rest.next();
            }
        }
    }

    LineShape::Directive(DirectiveLine { bare, name, args })
}

fn is_value_kind(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word
            | TokenKind::Run
            | TokenKind::Duration
            | TokenKind::ClockTime
            | TokenKind::NamedTime
    )
}

/// Parses order-free task parts after the marker
fn task_line(tokens: &[&Token], diagnostics: &mut Vec<Diagnostic>) -> LineShape {
    let mut parts = Vec::new();
    let mut comment = None;
    let mut last_comma: Option<Token> = None;
    let mut seen_part_since_comma = true;

    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];
        match tok.kind {
            TokenKind::Comment => {
                comment = Some(tok.clone());
                break;
            }
            TokenKind::Comma => {
                last_comma = Some(tok.clone());
                seen_part_since_comma = false;
                i += 1;
            }
            TokenKind::ClockTime | TokenKind::NamedTime => {
                parts.push(TaskPart::Time(tok.clone()));
                seen_part_since_comma = true;
                i += 1;
            }
            TokenKind::Duration => {
                parts.push(TaskPart::Duration(tok.clone()));
                seen_part_since_comma = true;
                i += 1;
            }
            TokenKind::PathStart => {
                let consumed = category_run(&tokens[i..], diagnostics, &mut parts);
                seen_part_since_comma = true;
                i += consumed;
            }
            _ => {
                parts.push(TaskPart::Fragment(tok.clone()));
                seen_part_since_comma = true;
                i += 1;
            }
        }
    }

    let trailing_comma = if seen_part_since_comma { None } else { last_comma };

    LineShape::Task(TaskLine {
        parts,
        trailing_comma,
        comment,
    })
}

/// Collects a maximal adjacent run of path tokens starting at a `:` and
/// validates its structure
///
/// Returns the number of tokens consumed. A run with no first segment is an
/// unterminated-path error; any empty segment marks the run malformed for
/// the analyzer to turn into a bad-category error.
fn category_run(
    tokens: &[&Token],
    diagnostics: &mut Vec<Diagnostic>,
    parts: &mut Vec<TaskPart>,
) -> usize {
    debug_assert_eq!(tokens[0].kind, TokenKind::PathStart);

    let mut len = 1;
    while len < tokens.len() {
        let prev = tokens[len - 1];
        let next = tokens[len];
        let adjacent = next.span.start == prev.span.end;
        let pathy = matches!(
            next.kind,
            TokenKind::PathStart | TokenKind::PathSep | TokenKind::Word
        );
        if !adjacent || !pathy {
            break;
        }
        len += 1;
    }

    let run = &tokens[..len];
    let span = run
        .iter()
        .map(|t| t.span)
        .reduce(|a, b| a.merge(&b))
        .unwrap_or_default();
    let text: String = run.iter().map(|t| t.text.as_str()).collect();

    if len == 1 {
        diagnostics.push(Diagnostic::spanned(
            DiagnosticCode::UnterminatedPath,
            "category path ':' has no segment".to_string(),
            span,
        ));
        parts.push(TaskPart::Fragment(tokens[0].clone()));
        return len;
    }

    // Legal structure: PathStart Word (PathSep Word)*
    let mut segments = Vec::new();
    let mut malformed = false;
    let mut expect_segment = true;
    for tok in &run[1..] {
        match (expect_segment, tok.kind) {
            (true, TokenKind::Word) => {
                segments.push((*tok).clone());
                expect_segment = false;
            }
            (false, TokenKind::PathSep) => expect_segment = true,
            _ => malformed = true,
        }
    }
    if expect_segment {
        // run ended on a separator
        malformed = true;
    }

    parts.push(TaskPart::Category(CategoryPart {
        span,
        text,
        segments,
        malformed,
    }));

    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tokenizer::tokenize_line;

    fn shape(line: &str) -> (LineShape, Vec<Diagnostic>) {
        recognize(&tokenize_line(line, 1))
    }

    #[test]
    fn blank_and_comment_only() {
        assert!(matches!(shape("").0, LineShape::Blank));
        assert!(matches!(shape("   ").0, LineShape::Blank));
        assert!(matches!(shape("# just a note").0, LineShape::CommentOnly));
    }

    #[test]
    fn marker_led_task() {
        let (s, diags) = shape("- 9am, Standup, 30m, :work::meetings");
        assert!(diags.is_empty());
        let task = match s {
            LineShape::Task(t) => t,
            other => panic!("expected task, got {:?}", other),
        };
        assert_eq!(task.parts.len(), 4);
        assert!(matches!(task.parts[0], TaskPart::Time(_)));
        assert!(matches!(task.parts[1], TaskPart::Fragment(_)));
        assert!(matches!(task.parts[2], TaskPart::Duration(_)));
        assert!(matches!(task.parts[3], TaskPart::Category(_)));
    }

    #[test]
    fn parts_are_order_free() {
        let (s, _) = shape("- Standup, 30m, 9am");
        let task = match s {
            LineShape::Task(t) => t,
            _ => panic!("expected task"),
        };
        assert!(matches!(task.parts[2], TaskPart::Time(_)));
    }

    #[test]
    fn marker_led_directive() {
        let (s, diags) = shape("- @plan day=2026-08-26, tz=UTC");
        assert!(diags.is_empty());
        let d = match s {
            LineShape::Directive(d) => d,
            _ => panic!("expected directive"),
        };
        assert!(!d.bare);
        assert_eq!(d.name.text, "plan");
        assert_eq!(d.args.len(), 2);
        assert_eq!(d.args[0].key.text, "day");
        assert_eq!(d.args[0].value.text, "2026-08-26");
    }

    #[test]
    fn bare_directive() {
        let (s, _) = shape("@scratchpad");
        let d = match s {
            LineShape::Directive(d) => d,
            _ => panic!("expected directive"),
        };
        assert!(d.bare);
        assert_eq!(d.name.text, "scratchpad");
    }

    #[test]
    fn malformed_keyvalue_is_syntactic_error() {
        let (_, diags) = shape("- @plan day 2026-08-26");
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::MalformedKeyValue));

        let (_, diags) = shape("- @plan day=");
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::MalformedKeyValue));
    }

    #[test]
    fn category_structure() {
        let (s, diags) = shape("- :a::b");
        assert!(diags.is_empty());
        let task = match s {
            LineShape::Task(t) => t,
            _ => panic!("expected task"),
        };
        let cat = match &task.parts[0] {
            TaskPart::Category(c) => c,
            other => panic!("expected category, got {:?}", other),
        };
        assert!(!cat.malformed);
        assert_eq!(
            cat.segments.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn trailing_separator_marks_category_malformed() {
        let (s, _) = shape("- :a::");
        let task = match s {
            LineShape::Task(t) => t,
            _ => panic!("expected task"),
        };
        let cat = match &task.parts[0] {
            TaskPart::Category(c) => c,
            _ => panic!("expected category"),
        };
        assert!(cat.malformed);
        assert_eq!(cat.text, ":a::");
    }

    #[test]
    fn double_separator_marks_category_malformed() {
        let (s, _) = shape("- :a:::b");
        let task = match s {
            LineShape::Task(t) => t,
            _ => panic!("expected task"),
        };
        let cats: Vec<_> = task
            .parts
            .iter()
            .filter_map(|p| match p {
                TaskPart::Category(c) => Some(c),
                _ => None,
            })
            .collect();
        assert_eq!(cats.len(), 1, "whole run belongs to one category part");
        assert!(cats[0].malformed);
        assert_eq!(cats[0].text, ":a:::b");
    }

    #[test]
    fn lone_colon_is_unterminated_path() {
        let (_, diags) = shape("- Task, :");
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::UnterminatedPath));
    }

    #[test]
    fn trailing_comma_detected_before_comment() {
        let (s, _) = shape("- 9am, Task, # note");
        let task = match s {
            LineShape::Task(t) => t,
            _ => panic!("expected task"),
        };
        assert!(task.trailing_comma.is_some());
        assert!(task.comment.is_some());
    }

    #[test]
    fn free_text_without_marker_is_unrecognized() {
        let (s, diags) = shape("buy milk at 9am");
        assert!(matches!(s, LineShape::Unrecognized));
        assert!(diags.iter().any(|d| d.code == DiagnosticCode::UnrecognizedLine));
    }
}
