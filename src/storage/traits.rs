//! Storage traits and error types
//!
//! This module defines the trait interface for poll history backends and
//! associated error types.

use crate::fetch::{FetchOutcome, FetchSession};
use crate::resource::ResourceRecord;
use crate::storage::PollRecord;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Poll not found: {0}")]
    PollNotFound(i64),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for poll history backends
pub trait Storage {
    // ===== Writing =====

    /// Stores a successful fetch and its records
    ///
    /// # Arguments
    ///
    /// * `session` - Server and sort the fetch used
    /// * `outcome` - The fetch result
    ///
    /// # Returns
    ///
    /// The ID of the new poll
    fn record_poll(&mut self, session: &FetchSession, outcome: &FetchOutcome)
        -> StorageResult<i64>;

    /// Deletes all but the `keep` most recent polls
    ///
    /// # Returns
    ///
    /// Number of polls deleted
    fn prune_history(&mut self, keep: usize) -> StorageResult<usize>;

    // ===== Reading =====

    /// Gets a poll by ID
    fn get_poll(&self, poll_id: i64) -> StorageResult<PollRecord>;

    /// Gets the most recent poll
    fn latest_poll(&self) -> StorageResult<Option<PollRecord>>;

    /// Gets the poll immediately before the given one
    fn previous_poll(&self, poll_id: i64) -> StorageResult<Option<PollRecord>>;

    /// Loads a poll's records in their original order
    fn load_records(&self, poll_id: i64) -> StorageResult<Vec<ResourceRecord>>;

    /// Time of the most recent poll
    fn last_poll_time(&self) -> StorageResult<Option<DateTime<Utc>>>;

    /// Total number of stored polls
    fn poll_count(&self) -> StorageResult<u64>;

    /// Most recent polls, newest first
    fn recent_polls(&self, limit: usize) -> StorageResult<Vec<PollRecord>>;
}
