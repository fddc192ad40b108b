//! `SQLite` connections with WAL mode and a busy timeout.
//!
//! Each invocation opens exactly one connection to one project file, does a
//! handful of reads and writes, and closes it. [`apply_pragmas`] runs on every
//! new connection and [`ensure_schema`] creates the table and indices if they
//! are missing.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::errors::Result;

const SCHEMA: &str = include_str!("schema.sql");

/// Configuration applied to each connection.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Busy timeout in milliseconds (default: 5000).
    pub busy_timeout_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
        }
    }
}

/// Set journal, locking and durability pragmas.
pub fn apply_pragmas(conn: &Connection, config: &ConnectionConfig) -> Result<()> {
    conn.execute_batch(&format!(
        "PRAGMA journal_mode = WAL;\
         PRAGMA busy_timeout = {};\
         PRAGMA synchronous = NORMAL;",
        config.busy_timeout_ms
    ))?;
    Ok(())
}

/// Create the `events` table and indices if absent.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Open (creating if needed) a file-backed connection with schema in place.
pub fn open_file(path: &Path, config: &ConnectionConfig) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    apply_pragmas(&conn, config)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory connection with schema in place (for testing).
pub fn open_in_memory(config: &ConnectionConfig) -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    apply_pragmas(&conn, config)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Read back the pragmas that matter for concurrent access.
pub fn verify_pragmas(conn: &Connection) -> Result<PragmaState> {
    let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
    let busy_timeout_ms: i64 = conn.query_row("PRAGMA busy_timeout", [], |row| row.get(0))?;
    Ok(PragmaState {
        journal_mode,
        busy_timeout_ms,
    })
}

/// Pragma state for verification.
#[derive(Debug)]
pub struct PragmaState {
    /// Journal mode (`"wal"` on disk, `"memory"` in memory).
    pub journal_mode: String,
    /// Effective busy timeout.
    pub busy_timeout_ms: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_connection_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_file(&dir.path().join("demo.db"), &ConnectionConfig::default()).unwrap();
        let pragmas = verify_pragmas(&conn).unwrap();
        assert_eq!(pragmas.journal_mode, "wal");
        assert_eq!(pragmas.busy_timeout_ms, 5000);
    }

    #[test]
    fn custom_busy_timeout() {
        let config = ConnectionConfig {
            busy_timeout_ms: 1234,
        };
        let conn = open_in_memory(&config).unwrap();
        assert_eq!(verify_pragmas(&conn).unwrap().busy_timeout_ms, 1234);
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = open_in_memory(&ConnectionConfig::default()).unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        let indices: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indices, 4);
    }
}
