//! Statistics from the poll history
//!
//! This module provides functionality for summarizing stored polls and
//! displaying the summary.

use crate::output::{diff_records, format_time_ago, RecordChanges};
use crate::storage::{PollRecord, Storage};
use crate::HarvestError;
use chrono::{DateTime, Utc};

/// Number of polls listed in the summary
const RECENT_POLLS: usize = 10;

/// Poll history summary
#[derive(Debug, Clone)]
pub struct HistoryStatistics {
    /// Total number of stored polls
    pub total_polls: u64,

    /// Time of the most recent poll
    pub last_poll_at: Option<DateTime<Utc>>,

    /// Most recent polls, newest first
    pub recent_polls: Vec<PollRecord>,

    /// Difference between the two most recent polls
    pub latest_changes: Option<RecordChanges>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(HistoryStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<HistoryStatistics, HarvestError> {
    let total_polls = storage.poll_count()?;
    let last_poll_at = storage.last_poll_time()?;
    let recent_polls = storage.recent_polls(RECENT_POLLS)?;

    let latest_changes = match storage.latest_poll()? {
        Some(latest) => match storage.previous_poll(latest.id)? {
            Some(previous) => Some(diff_records(
                &storage.load_records(previous.id)?,
                &storage.load_records(latest.id)?,
            )),
            None => None,
        },
        None => None,
    };

    Ok(HistoryStatistics {
        total_polls,
        last_poll_at,
        recent_polls,
        latest_changes,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `now` - Reference time for relative timestamps
pub fn print_statistics(stats: &HistoryStatistics, now: DateTime<Utc>) {
    print!("{}", format_statistics(stats, now));
}

fn format_statistics(stats: &HistoryStatistics, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    out.push_str("=== Poll History ===\n\n");
    out.push_str(&format!("  Total polls: {}\n", stats.total_polls));
    out.push_str(&format!(
        "  Last updated: {}\n\n",
        format_time_ago(stats.last_poll_at, now)
    ));

    if !stats.recent_polls.is_empty() {
        out.push_str("Recent Polls:\n");
        for poll in &stats.recent_polls {
            let when = poll
                .fetched_at_utc()
                .map(|t| format_time_ago(Some(t), now))
                .unwrap_or_else(|_| poll.fetched_at.clone());
            out.push_str(&format!(
                "  #{} {} server {} ({}): {} resources, {} warnings\n",
                poll.id, when, poll.server_id, poll.sort_key, poll.record_count, poll.warning_count
            ));
        }
        out.push('\n');
    }

    if let Some(changes) = &stats.latest_changes {
        out.push_str("Latest Changes:\n");
        if changes.is_empty() {
            out.push_str("  none\n");
        }
        for name in &changes.added {
            out.push_str(&format!("  + {}\n", name));
        }
        for name in &changes.removed {
            out.push_str(&format!("  - {}\n", name));
        }
    }

    out
}
