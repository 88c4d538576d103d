//! Markdown run report
//!
//! Generates a human-readable report of a run, including counts, the failure breakdown and
//! a table of dropped entries.

use crate::output::{OutputResult, RunSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for a run
pub fn write_markdown_report(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_report(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Harvest Report: {}\n\n", summary.source_name));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    let status = if summary.cancelled {
        "cancelled"
    } else if summary.is_empty_catalog() {
        "empty catalog"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n\n", status));

    md.push_str("## Statistics\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", summary.pages));
    md.push_str(&format!("- **Entries Attempted**: {}\n", summary.attempted));
    md.push_str(&format!("- **Entries Resolved**: {}\n", summary.resolved));
    md.push_str(&format!("- **Entries Failed**: {}\n", summary.failed));
    md.push_str(&format!("- **Playlist Records**: {}\n", summary.streams));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        summary.success_rate()
    ));

    let by_step = summary.failures_by_step();
    if !by_step.is_empty() {
        md.push_str("## Failures by Step\n\n");
        md.push_str("| Step | Count |\n");
        md.push_str("|------|-------|\n");
        for (step, count) in by_step {
            md.push_str(&format!("| {} | {} |\n", step, count));
        }
        md.push('\n');

        md.push_str("## Dropped Entries\n\n");
        md.push_str("| Entry | Title | Step | Error |\n");
        md.push_str("|-------|-------|------|-------|\n");
        for failure in &summary.failures {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(&failure.entry_id),
                escape_cell(failure.title.as_deref().unwrap_or("-")),
                failure.step,
                escape_cell(&failure.message)
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
