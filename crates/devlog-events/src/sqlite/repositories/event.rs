//! Event repository: append and filtered reads over the `events` table.
//!
//! Events are immutable and append-only. There is no update or delete.

use std::fmt::Write as _;

use rusqlite::types::ToSql;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior, params};

use crate::errors::{EventStoreError, Result};
use crate::sqlite::row_types::{EVENT_COLUMNS, EventRow};
use crate::types::{EntityType, EventType, NewEvent};

/// Read order. Ties on timestamp break on insertion order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

/// Predicate, order and limit for [`EventRepo::query`].
///
/// Every field narrows the result; the default matches every row.
#[derive(Clone, Debug, Default)]
pub struct EventQuery {
    /// Only events from this session.
    pub session_id: Option<String>,
    /// Only events in this slice.
    pub slice_id: Option<String>,
    /// Only these event types (empty = all).
    pub event_types: Vec<EventType>,
    /// Only events about this entity type.
    pub entity_type: Option<EntityType>,
    /// Only events about this entity ID.
    pub entity_id: Option<String>,
    /// Only events strictly after this stored-format timestamp.
    pub since: Option<String>,
    /// Read order.
    pub order: Order,
    /// Maximum rows.
    pub limit: Option<u32>,
}

impl EventQuery {
    /// Match everything, oldest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one session.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Restrict to one slice.
    #[must_use]
    pub fn slice(mut self, slice_id: impl Into<String>) -> Self {
        self.slice_id = Some(slice_id.into());
        self
    }

    /// Restrict to the given event types.
    #[must_use]
    pub fn types(mut self, types: &[EventType]) -> Self {
        self.event_types = types.to_vec();
        self
    }

    /// Restrict to one entity.
    #[must_use]
    pub fn entity(mut self, entity_type: EntityType, entity_id: Option<String>) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = entity_id;
        self
    }

    /// Restrict to events after `cutoff`.
    #[must_use]
    pub fn since(mut self, cutoff: impl Into<String>) -> Self {
        self.since = Some(cutoff.into());
        self
    }

    /// Newest first.
    #[must_use]
    pub fn newest_first(mut self) -> Self {
        self.order = Order::Desc;
        self
    }

    /// At most `n` rows.
    #[must_use]
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

/// Event repository: stateless, every method takes `&Connection`.
pub struct EventRepo;

impl EventRepo {
    /// Append one event inside an `IMMEDIATE` transaction.
    ///
    /// The timestamp is `max(now, latest stored timestamp)`, so timestamps
    /// never go backwards within a store even if the clock does.
    /// Returns the assigned insertion order and timestamp.
    pub fn insert(conn: &Connection, event: &NewEvent) -> Result<(i64, String)> {
        let data = serde_json::to_string(&event.data.to_value()?)?;
        let tags = serde_json::to_string(&event.tags)?;

        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let inserted = tx.query_row(
            &format!(
                "INSERT INTO events (event_id, timestamp, session_id, slice_id, event_type,
                                     entity_type, entity_id, data, tags)
                 SELECT ?1, MAX({now}, COALESCE((SELECT MAX(timestamp) FROM events), '')),
                        ?2, ?3, ?4, ?5, ?6, ?7, ?8
                 RETURNING id, timestamp",
                now = devlog_core::time::SQL_NOW,
            ),
            params![
                event.event_id.as_str(),
                event.session_id.as_str(),
                event.slice_id.as_ref().map(|s| s.as_str()),
                event.event_type().as_str(),
                event.entity_type.as_str(),
                event.entity_id,
                data,
                tags,
            ],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        );
        let inserted = match inserted {
            Ok(v) => v,
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                return Err(EventStoreError::DuplicateEvent(event.event_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit()?;
        Ok(inserted)
    }

    /// Get a single event by its event ID.
    pub fn get_by_event_id(conn: &Connection, event_id: &str) -> Result<Option<EventRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
                params![event_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Filtered read.
    pub fn query(conn: &Connection, q: &EventQuery) -> Result<Vec<EventRow>> {
        let mut sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1 = 1");
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(session_id) = &q.session_id {
            params.push(Box::new(session_id.clone()));
            let _ = write!(sql, " AND session_id = ?{}", params.len());
        }
        if let Some(slice_id) = &q.slice_id {
            params.push(Box::new(slice_id.clone()));
            let _ = write!(sql, " AND slice_id = ?{}", params.len());
        }
        if !q.event_types.is_empty() {
            let mut placeholders = Vec::with_capacity(q.event_types.len());
            for t in &q.event_types {
                params.push(Box::new(t.as_str()));
                placeholders.push(format!("?{}", params.len()));
            }
            let _ = write!(sql, " AND event_type IN ({})", placeholders.join(", "));
        }
        if let Some(entity_type) = q.entity_type {
            params.push(Box::new(entity_type.as_str()));
            let _ = write!(sql, " AND entity_type = ?{}", params.len());
        }
        if let Some(entity_id) = &q.entity_id {
            params.push(Box::new(entity_id.clone()));
            let _ = write!(sql, " AND entity_id = ?{}", params.len());
        }
        if let Some(since) = &q.since {
            params.push(Box::new(since.clone()));
            let _ = write!(sql, " AND timestamp > ?{}", params.len());
        }
        match q.order {
            Order::Asc => sql.push_str(" ORDER BY timestamp ASC, id ASC"),
            Order::Desc => sql.push_str(" ORDER BY timestamp DESC, id DESC"),
        }
        if let Some(limit) = q.limit {
            let _ = write!(sql, " LIMIT {limit}");
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn ToSql> = params.iter().map(Box::as_ref).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Total number of events.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Latest stored timestamp, if any.
    pub fn latest_timestamp(conn: &Connection) -> Result<Option<String>> {
        let ts: Option<String> =
            conn.query_row("SELECT MAX(timestamp) FROM events", [], |row| row.get(0))?;
        Ok(ts)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
        EventRow::from_row_at(row, 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
