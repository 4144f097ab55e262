//! `dayplan shift` - move one line's time, preserving everything else

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::analyze;
use crate::shift::shift;

use super::app::AnalyzerArgs;
use super::output::Output;

pub fn run(
    output: &Output,
    file: &Path,
    line_no: u32,
    offset: &str,
    write: bool,
    options: &AnalyzerArgs,
) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read plan file: {}", file.display()))?;
    let options = options.resolve(file)?;

    let analysis = analyze(&source, &options);
    let outcome = shift(&analysis, line_no, offset)
        .with_context(|| format!("Cannot shift line {} of {}", line_no, file.display()))?;

    if write {
        let edited = splice_line(&source, line_no, &outcome.new_line_text)?;
        write_atomically(file, &edited)?;
        output.verbose_ctx("shift", &format!("Wrote {}", file.display()));
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "line": outcome.line_no,
            "newLineText": outcome.new_line_text,
            "affectedLineIds": outcome.affected_line_ids,
            "written": write,
        }));
        return Ok(());
    }

    output.success(&outcome.new_line_text);
    if !outcome.affected_line_ids.is_empty() {
        output.line(&format!(
            "{} downstream line(s) now stale: {}",
            outcome.affected_line_ids.len(),
            outcome
                .affected_line_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.line("re-run 'dayplan show' after writing for their new times");
    }

    Ok(())
}

/// Replaces one line in the document, leaving every other line untouched
fn splice_line(source: &str, line_no: u32, new_line: &str) -> Result<String> {
    let mut lines: Vec<&str> = source.lines().collect();
    let index = line_no
        .checked_sub(1)
        .map(|i| i as usize)
        .filter(|&i| i < lines.len())
        .ok_or_else(|| anyhow::anyhow!("no line {} in document", line_no))?;

    lines[index] = new_line;

    let mut edited = lines.join("\n");
    if source.ends_with('\n') {
        edited.push('\n');
    }
    Ok(edited)
}

/// Writes via temp file + rename so a crash never leaves a torn file
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("plan.tmp");

    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_replaces_only_the_target_line() {
        let source = "- 9am, A\n- B\n- C\n";
        let edited = splice_line(source, 2, "- 10am, B").unwrap();
        assert_eq!(edited, "- 9am, A\n- 10am, B\n- C\n");
    }

    #[test]
    fn splice_preserves_missing_final_newline() {
        let source = "- 9am, A\n- B";
        let edited = splice_line(source, 1, "- 8am, A").unwrap();
        assert_eq!(edited, "- 8am, A\n- B");
    }

    #[test]
    fn splice_rejects_out_of_range_lines() {
        assert!(splice_line("- 9am, A", 3, "x").is_err());
        assert!(splice_line("- 9am, A", 0, "x").is_err());
    }
}
