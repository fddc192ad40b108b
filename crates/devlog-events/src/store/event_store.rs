//! [`ProjectStore`]: the handle to one project's append-only log.
//!
//! A store wraps a single `rusqlite::Connection`. It is opened per invocation,
//! used for a few reads and writes, and closed, either explicitly with
//! [`ProjectStore::close`] or by dropping it.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::errors::{EventStoreError, Result};
use crate::sqlite::connection::{self, ConnectionConfig};
use crate::sqlite::repositories::activity::ActivityRepo;
use crate::sqlite::repositories::event::{EventQuery, EventRepo};
use crate::sqlite::row_types::{FileActivityRow, WindowStats};
use crate::types::{Event, NewEvent};

/// Handle to one project's event log.
pub struct ProjectStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore").field("path", &self.path).finish_non_exhaustive()
    }
}

impl ProjectStore {
    /// Open the log at `path`, creating the file and schema if absent.
    pub fn open(path: &Path, config: &ConnectionConfig) -> Result<Self> {
        let conn = connection::open_file(path, config)?;
        tracing::debug!(path = %path.display(), "opened event store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the log at `path` only if the file already exists.
    pub fn open_existing(path: &Path, config: &ConnectionConfig) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::open(path, config).map(Some)
    }

    /// Open a private in-memory log (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: connection::open_in_memory(&ConnectionConfig::default())?,
            path: None,
        })
    }

    /// Backing file, or `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one event; returns it as stored.
    pub fn append(&self, event: &NewEvent) -> Result<Event> {
        let (insertion_order, timestamp) = EventRepo::insert(&self.conn, event)?;
        let timestamp = devlog_core::time::parse_timestamp(&timestamp)
            .ok_or(EventStoreError::InvalidTimestamp(timestamp))?;
        tracing::debug!(
            event_id = %event.event_id,
            event_type = %event.event_type(),
            session_id = %event.session_id,
            "appended event"
        );
        Ok(Event {
            insertion_order,
            event_id: event.event_id.clone(),
            timestamp,
            session_id: event.session_id.clone(),
            slice_id: event.slice_id.clone(),
            entity_type: event.entity_type,
            entity_id: event.entity_id.clone(),
            data: event.data.clone(),
            tags: event.tags.clone(),
        })
    }

    /// Filtered, ordered, limited read.
    pub fn query(&self, q: &EventQuery) -> Result<Vec<Event>> {
        EventRepo::query(&self.conn, q)?
            .into_iter()
            .map(|row| row.into_event())
            .collect()
    }

    /// First match of `q`, if any.
    pub fn first(&self, q: &EventQuery) -> Result<Option<Event>> {
        let q = q.clone().limit(1);
        Ok(self.query(&q)?.into_iter().next())
    }

    /// One event by ID.
    pub fn get(&self, event_id: &str) -> Result<Option<Event>> {
        EventRepo::get_by_event_id(&self.conn, event_id)?
            .map(|row| row.into_event())
            .transpose()
    }

    /// Total number of events.
    pub fn count(&self) -> Result<i64> {
        EventRepo::count(&self.conn)
    }

    /// Latest stored timestamp text, if any.
    pub fn latest_timestamp(&self) -> Result<Option<String>> {
        EventRepo::latest_timestamp(&self.conn)
    }

    /// Files created or modified, grouped by path, newest first.
    pub fn file_activity(&self, since: Option<&str>, limit: u32) -> Result<Vec<FileActivityRow>> {
        ActivityRepo::file_activity(&self.conn, since, limit)
    }

    /// Distinct counts after `since`.
    pub fn window_stats(&self, since: &str) -> Result<WindowStats> {
        ActivityRepo::window_stats(&self.conn, since)
    }

    /// Event count per type, largest first.
    pub fn type_histogram(&self) -> Result<Vec<(String, i64)>> {
        ActivityRepo::type_histogram(&self.conn)
    }

    /// Close the connection, surfacing any error.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| EventStoreError::Sqlite(e))
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
