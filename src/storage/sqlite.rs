//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::fetch::{FetchOutcome, FetchSession};
use crate::resource::{ResourceRecord, StatTable, Upload};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::PollRecord;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const POLL_COLUMNS: &str =
    "id, fetched_at, server_id, sort_key, record_count, warning_count";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn poll_from_row(row: &Row) -> rusqlite::Result<PollRecord> {
    Ok(PollRecord {
        id: row.get(0)?,
        fetched_at: row.get(1)?,
        server_id: row.get(2)?,
        sort_key: row.get(3)?,
        record_count: row.get(4)?,
        warning_count: row.get(5)?,
    })
}

/// Raw resource columns, decoded after the query finishes
struct ResourceRow {
    name: String,
    category: String,
    planets_json: String,
    stats_json: String,
    uploaded_at: Option<String>,
    uploaded_by: Option<String>,
}

impl ResourceRow {
    fn into_record(self) -> StorageResult<ResourceRecord> {
        let planets: Vec<String> = serde_json::from_str(&self.planets_json)?;
        let stats: StatTable = serde_json::from_str(&self.stats_json)?;
        let upload = match (self.uploaded_at, self.uploaded_by) {
            (Some(uploaded_at), Some(uploaded_by)) => Some(Upload {
                uploaded_at,
                uploaded_by,
            }),
            _ => None,
        };

        Ok(ResourceRecord {
            name: self.name,
            category: self.category,
            planets,
            stats,
            upload,
        })
    }
}

impl Storage for SqliteStorage {
    // ===== Writing =====

    fn record_poll(
        &mut self,
        session: &FetchSession,
        outcome: &FetchOutcome,
    ) -> StorageResult<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO polls (fetched_at, server_id, sort_key, record_count, warning_count)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                outcome.fetched_at.to_rfc3339(),
                session.server_id(),
                session.sort_key().client_name(),
                outcome.records.len() as i64,
                outcome.warnings.len() as i64,
            ],
        )?;
        let poll_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO resources (poll_id, position, name, category, planets_json,
                 stats_json, uploaded_at, uploaded_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for (position, record) in outcome.records.iter().enumerate() {
                stmt.execute(params![
                    poll_id,
                    position as i64,
                    record.name,
                    record.category,
                    serde_json::to_string(&record.planets)?,
                    serde_json::to_string(&record.stats)?,
                    record.uploaded_at(),
                    record.uploaded_by(),
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Stored poll {} with {} resources",
            poll_id,
            outcome.records.len()
        );
        Ok(poll_id)
    }

    fn prune_history(&mut self, keep: usize) -> StorageResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM polls WHERE id NOT IN (SELECT id FROM polls ORDER BY id DESC LIMIT ?1)",
            params![keep as i64],
        )?;
        if deleted > 0 {
            tracing::debug!("Pruned {} old polls", deleted);
        }
        Ok(deleted)
    }

    // ===== Reading =====

    fn get_poll(&self, poll_id: i64) -> StorageResult<PollRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM polls WHERE id = ?1", POLL_COLUMNS),
                params![poll_id],
                poll_from_row,
            )
            .optional()?
            .ok_or(StorageError::PollNotFound(poll_id))
    }

    fn latest_poll(&self) -> StorageResult<Option<PollRecord>> {
        let poll = self
            .conn
            .query_row(
                &format!("SELECT {} FROM polls ORDER BY id DESC LIMIT 1", POLL_COLUMNS),
                [],
                poll_from_row,
            )
            .optional()?;
        Ok(poll)
    }

    fn previous_poll(&self, poll_id: i64) -> StorageResult<Option<PollRecord>> {
        let poll = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM polls WHERE id < ?1 ORDER BY id DESC LIMIT 1",
                    POLL_COLUMNS
                ),
                params![poll_id],
                poll_from_row,
            )
            .optional()?;
        Ok(poll)
    }

    fn load_records(&self, poll_id: i64) -> StorageResult<Vec<ResourceRecord>> {
        // Distinguish "no such poll" from "poll with zero records"
        self.get_poll(poll_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT name, category, planets_json, stats_json, uploaded_at, uploaded_by
             FROM resources WHERE poll_id = ?1 ORDER BY position",
        )?;

        let rows = stmt
            .query_map(params![poll_id], |row| {
                Ok(ResourceRow {
                    name: row.get(0)?,
                    category: row.get(1)?,
                    planets_json: row.get(2)?,
                    stats_json: row.get(3)?,
                    uploaded_at: row.get(4)?,
                    uploaded_by: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ResourceRow::into_record).collect()
    }

    fn last_poll_time(&self) -> StorageResult<Option<DateTime<Utc>>> {
        match self.latest_poll()? {
            Some(poll) => Ok(Some(poll.fetched_at_utc()?)),
            None => Ok(None),
        }
    }

    fn poll_count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM polls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn recent_polls(&self, limit: usize) -> StorageResult<Vec<PollRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM polls ORDER BY id DESC LIMIT ?1",
            POLL_COLUMNS
        ))?;
        let polls = stmt
            .query_map(params![limit as i64], poll_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(polls)
    }
}
