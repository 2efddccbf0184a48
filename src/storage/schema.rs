//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the poll history database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per successful fetch
CREATE TABLE IF NOT EXISTS polls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fetched_at TEXT NOT NULL,
    server_id TEXT NOT NULL,
    sort_key TEXT NOT NULL,
    record_count INTEGER NOT NULL,
    warning_count INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_polls_fetched_at ON polls(fetched_at);

-- Records returned by a poll, in document order
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    poll_id INTEGER NOT NULL REFERENCES polls(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    planets_json TEXT NOT NULL,
    stats_json TEXT NOT NULL,
    uploaded_at TEXT,
    uploaded_by TEXT,
    UNIQUE(poll_id, position)
);

CREATE INDEX IF NOT EXISTS idx_resources_poll ON resources(poll_id);
CREATE INDEX IF NOT EXISTS idx_resources_name ON resources(name);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
