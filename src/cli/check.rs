//! `dayplan check` - analyze a plan file and report diagnostics

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{analyze, LineStatus};

use super::app::AnalyzerArgs;
use super::output::Output;

pub fn run(output: &Output, file: &Path, options: &AnalyzerArgs) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read plan file: {}", file.display()))?;
    let options = options.resolve(file)?;

    let analysis = analyze(&source, &options);

    if output.is_json() {
        output.data(&analysis);
    } else {
        for record in &analysis.lines {
            for diagnostic in &record.diagnostics {
                let at = diagnostic
                    .span
                    .map(|s| format!("{}:{}", record.line_no, s.start + 1))
                    .unwrap_or_else(|| record.line_no.to_string());
                output.line(&format!("{:<8} {} {}", at, diagnostic.code, diagnostic.message));
            }
        }
    }

    let invalid = analysis
        .lines
        .iter()
        .filter(|l| l.status == LineStatus::Invalid)
        .count();
    let warned = analysis
        .lines
        .iter()
        .filter(|l| l.status == LineStatus::ValidWithWarnings)
        .count();

    output.verbose_ctx(
        "check",
        &format!("{} invalid, {} with warnings", invalid, warned),
    );

    if invalid > 0 {
        anyhow::bail!(
            "{} invalid line(s) in {}",
            invalid,
            file.display()
        );
    }

    if !output.is_json() {
        output.line(&format!(
            "{}: {} line(s) ok{}",
            file.display(),
            analysis.lines.len(),
            if warned > 0 {
                format!(", {} with warnings", warned)
            } else {
                String::new()
            }
        ));
    }

    Ok(())
}
