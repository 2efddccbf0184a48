//! Markdown report generation
//!
//! This module renders the current resource list as a markdown document,
//! optionally with the changes since the previous poll.

use crate::output::{OutputResult, RecordChanges};
use crate::resource::ResourceRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report to a file
///
/// # Arguments
///
/// * `records` - The resources to list
/// * `changes` - Changes since the previous poll, if known
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(
    records: &[ResourceRecord],
    changes: Option<&RecordChanges>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(records, changes);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats the resource list as markdown
///
/// # Arguments
///
/// * `records` - The resources to list
/// * `changes` - Changes since the previous poll, if known
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(
    records: &[ResourceRecord],
    changes: Option<&RecordChanges>,
) -> String {
    let mut md = String::new();

    md.push_str("# Current Resources\n\n");
    md.push_str(&format!("- **Resources**: {}\n", records.len()));

    let with_stats = records.iter().filter(|r| !r.stats.is_empty()).count();
    md.push_str(&format!("- **With Stats**: {}\n\n", with_stats));

    if let Some(changes) = changes {
        md.push_str("## Changes Since Last Poll\n\n");
        if changes.is_empty() {
            md.push_str("No changes.\n\n");
        } else {
            for name in &changes.added {
                md.push_str(&format!("- Added: {}\n", escape_cell(name)));
            }
            for name in &changes.removed {
                md.push_str(&format!("- Removed: {}\n", escape_cell(name)));
            }
            md.push('\n');
        }
    }

    if records.is_empty() {
        md.push_str("_No resources found._\n");
        return md;
    }

    md.push_str("## Resources\n\n");
    md.push_str("| Resource | Category | Planets | Stats | Uploaded |\n");
    md.push_str("|----------|----------|---------|-------|----------|\n");

    for record in records {
        let stats = record
            .stats
            .iter()
            .map(|(name, stat)| format!("{} {} ({}%)", name, stat.value, stat.percentage))
            .collect::<Vec<_>>()
            .join(", ");
        let uploaded = match (record.uploaded_at(), record.uploaded_by()) {
            (Some(at), Some(by)) => format!("{} by {}", at, by),
            _ => String::new(),
        };

        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&record.name),
            escape_cell(&record.category),
            escape_cell(&record.planets.join(", ")),
            escape_cell(&stats),
            escape_cell(&uploaded),
        ));
    }

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
