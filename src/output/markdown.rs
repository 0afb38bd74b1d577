//! Markdown summary generation
//!
//! Renders a [`RunSummary`] as a human-readable Markdown report.

use crate::output::{OutputResult, RunSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Saved paths listed before the report truncates
const MAX_LISTED_FILES: usize = 50;

/// Writes a Markdown summary to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn write_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Image Grabber Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds ({:.2} minutes)\n",
        summary.elapsed.as_secs_f64(),
        summary.elapsed.as_secs_f64() / 60.0
    ));
    let status = if summary.cancelled { "cancelled" } else { "completed" };
    md.push_str(&format!("- **Status**: {}\n", status));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Inputs
    md.push_str("## Inputs\n\n");
    md.push_str(&format!("- **Sources**: {}\n", summary.sources.join(", ")));
    md.push_str(&format!("- **Keywords**: {}\n", summary.keywords.join(", ")));
    md.push_str(&format!("- **Page Depth**: {}\n\n", summary.page_depth));

    // Counters
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Discovery Tasks | {} |\n", summary.discovery_tasks));
    md.push_str(&format!("| Image URLs Found | {} |\n", summary.discovered_urls));
    md.push_str(&format!("| Download Tasks | {} |\n", summary.download_tasks));
    md.push_str(&format!("| Images Saved | {} |\n", summary.saved.len()));
    md.push_str(&format!("| Failures | {} |\n\n", summary.total_failures()));
    md.push_str(&format!("Success rate: {:.2}%\n\n", summary.success_rate()));

    if !summary.failures.is_empty() {
        md.push_str("## Failures by Kind\n\n");
        md.push_str("| Kind | Count |\n");
        md.push_str("|------|-------|\n");
        for (kind, count) in &summary.failures {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    if !summary.saved.is_empty() {
        md.push_str("## Saved Files\n\n");
        for path in summary.saved.iter().take(MAX_LISTED_FILES) {
            md.push_str(&format!("- {}\n", path.display()));
        }
        if summary.saved.len() > MAX_LISTED_FILES {
            md.push_str(&format!(
                "\n... and {} more\n",
                summary.saved.len() - MAX_LISTED_FILES
            ));
        }
        md.push('\n');
    }

    md
}
