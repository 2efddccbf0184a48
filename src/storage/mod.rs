//! Storage module for poll history
//!
//! This module persists successful fetches so a later run can tell what is new:
//! - SQLite database initialization and schema management
//! - One poll row per fetch, with its records in document order
//! - Pruning of old polls

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a stored poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRecord {
    pub id: i64,
    pub fetched_at: String,
    pub server_id: String,
    pub sort_key: String,
    pub record_count: u32,
    pub warning_count: u32,
}

impl PollRecord {
    /// Parses the stored RFC 3339 fetch time
    pub fn fetched_at_utc(&self) -> StorageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.fetched_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| StorageError::InvalidTimestamp(self.fetched_at.clone()))
    }
}
