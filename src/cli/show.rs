//! `dayplan show` - print the resolved schedule

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::{analyze, LineStatus, Node};

use super::app::AnalyzerArgs;
use super::output::Output;

pub fn run(output: &Output, file: &Path, options: &AnalyzerArgs) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read plan file: {}", file.display()))?;
    let options = options.resolve(file)?;

    let analysis = analyze(&source, &options);

    if output.is_json() {
        let tasks: Vec<_> = analysis
            .lines
            .iter()
            .filter(|record| record.status != LineStatus::Invalid)
            .filter_map(|record| {
                record.node.as_ref().and_then(Node::as_task).map(|task| {
                    serde_json::json!({
                        "id": record.id,
                        "line": record.line_no,
                        "status": record.status,
                        "task": task,
                    })
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "day": analysis.context.day,
            "timezone": analysis.context.timezone.name(),
            "tasks": tasks,
        }));
        return Ok(());
    }

    output.line(&format!(
        "{} ({})",
        analysis.context.day, analysis.context.timezone
    ));
    output.blank();
    output.line(&format!("{:<15} {:<6} {:<30} CATEGORIES", "TIME", "MIN", "TITLE"));
    output.line(&"-".repeat(72));

    let mut shown = 0usize;
    for record in &analysis.lines {
        // invalid lines keep a node for diagnostics and hover, but they
        // never joined the schedule
        if record.status == LineStatus::Invalid {
            continue;
        }
        let Some(task) = record.node.as_ref().and_then(Node::as_task) else {
            continue;
        };

        let time = match (task.start, task.end) {
            (Some(start), Some(end)) => {
                format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
            }
            _ => "--:--".to_string(),
        };
        let categories = task
            .categories
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        output.line(&format!(
            "{:<15} {:<6} {:<30} {}",
            time, task.duration_min, task.title, categories
        ));
        shown += 1;
    }

    output.blank();
    output.line(&format!("{} task(s)", shown));

    Ok(())
}
