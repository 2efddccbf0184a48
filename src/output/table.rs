//! Plain-text resource table

use crate::resource::ResourceRecord;

const EMPTY_HINT: &str = "No resources found. Please log in to Galaxy Harvester.";
const HEADERS: [&str; 5] = ["Resource", "Category", "Planets", "Stats", "Uploaded"];

/// Renders records as a fixed-width text table
///
/// Stats are shown as `Name=value(pct%)` in column order, and the uploaded
/// column as `"<time> by <user>"`. An empty list renders a login hint instead
/// of an empty table.
pub fn render_table(records: &[ResourceRecord]) -> String {
    if records.is_empty() {
        return format!("{}\n", EMPTY_HINT);
    }

    let rows: Vec<[String; 5]> = records.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(separator.join("-+-").trim_end());
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn row_cells(record: &ResourceRecord) -> [String; 5] {
    let stats = record
        .stats
        .iter()
        .map(|(name, stat)| format!("{}={}({}%)", name, stat.value, stat.percentage))
        .collect::<Vec<_>>()
        .join(" ");

    let uploaded = match (record.uploaded_at(), record.uploaded_by()) {
        (Some(at), Some(by)) => format!("{} by {}", at, by),
        _ => String::new(),
    };

    [
        record.name.clone(),
        record.category.clone(),
        record.planets.join(", "),
        stats,
        uploaded,
    ]
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}
