//! Output module for presenting fetched resources
//!
//! This module handles:
//! - Rendering records as a text table, markdown or JSON
//! - Detecting which resources appeared or disappeared between polls
//! - Summarizing the stored poll history

mod changes;
mod markdown;
pub mod stats;
mod table;

pub use changes::{diff_records, RecordChanges};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{load_statistics, print_statistics, HistoryStatistics};
pub use table::render_table;

use crate::resource::ResourceRecord;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// How records are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown output format '{}', expected table, markdown or json",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Json => "json",
        };
        f.write_str(s)
    }
}

/// Renders records in the requested format
pub fn render_records(records: &[ResourceRecord], format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Table => Ok(render_table(records)),
        OutputFormat::Markdown => Ok(format_markdown_report(records, None)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

/// Formats how long ago something happened, e.g. `"5m ago"`
///
/// # Arguments
///
/// * `then` - The moment, or `None` if it never happened
/// * `now` - The current time
///
/// # Returns
///
/// `"Never"`, or the elapsed time in the largest whole unit of seconds,
/// minutes, hours or days
pub fn format_time_ago(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(then) = then else {
        return "Never".to_string();
    };

    let seconds = (now - then).num_seconds().max(0);
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_time_ago() {
        let now = Utc::now();
        assert_eq!(format_time_ago(None, now), "Never");
        assert_eq!(format_time_ago(Some(now - Duration::seconds(5)), now), "5s ago");
        assert_eq!(format_time_ago(Some(now - Duration::seconds(125)), now), "2m ago");
        assert_eq!(format_time_ago(Some(now - Duration::hours(3)), now), "3h ago");
        assert_eq!(format_time_ago(Some(now - Duration::hours(50)), now), "2d ago");
    }

    #[test]
    fn test_format_time_ago_future_is_zero() {
        let now = Utc::now();
        assert_eq!(format_time_ago(Some(now + Duration::seconds(30)), now), "0s ago");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_json() {
        let records = vec![ResourceRecord {
            name: "Aszolite".to_string(),
            ..Default::default()
        }];
        let json = render_records(&records, OutputFormat::Json).unwrap();
        let parsed: Vec<ResourceRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, records);
    }
}
