//! Work item repository.
//!
//! A work item is a `work_queued` or `work_blocked` event. It is completed
//! when some `work_completed` event's `data.work_id` equals its `event_id`;
//! that back-reference is the only correlation used.

use std::fmt::Write as _;

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::sqlite::row_types::EventRow;
use crate::types::EventType;

use super::type_list;

const ITEM_COLUMNS: &str = "e.id, e.event_id, e.timestamp, e.session_id, e.slice_id, e.event_type,
                            e.entity_type, e.entity_id, e.data, e.tags";

const COMPLETED_EXPR: &str = "EXISTS (SELECT 1 FROM events c
                                      WHERE c.event_type = 'work_completed'
                                        AND json_extract(c.data, '$.work_id') = e.event_id)";

/// Work item repository: stateless, every method takes `&Connection`.
pub struct WorkRepo;

impl WorkRepo {
    /// Work items newest first, each paired with its completed flag.
    ///
    /// With `open_only`, completed items are excluded before the limit applies.
    pub fn list(conn: &Connection, open_only: bool, limit: u32) -> Result<Vec<(EventRow, bool)>> {
        let mut sql = format!(
            "SELECT {ITEM_COLUMNS}, {COMPLETED_EXPR} AS completed
             FROM events e
             WHERE e.event_type IN ({})",
            type_list(EventType::is_work_item)
        );
        if open_only {
            let _ = write!(sql, " AND NOT {COMPLETED_EXPR}");
        }
        let _ = write!(sql, " ORDER BY e.timestamp DESC, e.id DESC LIMIT {limit}");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| Ok((EventRow::from_row_at(row, 0)?, row.get::<_, bool>(10)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The most recent work item whose event ID starts with `prefix`.
    pub fn find_by_prefix(conn: &Connection, prefix: &str) -> Result<Option<(EventRow, bool)>> {
        let row = conn
            .query_row(
                &format!(
                    "SELECT {ITEM_COLUMNS}, {COMPLETED_EXPR} AS completed
                     FROM events e
                     WHERE e.event_type IN ({})
                       AND substr(e.event_id, 1, length(?1)) = ?1
                     ORDER BY e.timestamp DESC, e.id DESC
                     LIMIT 1",
                    type_list(EventType::is_work_item)
                ),
                params![prefix],
                |row| Ok((EventRow::from_row_at(row, 0)?, row.get::<_, bool>(10)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// Whether a completion references `work_id`.
    pub fn is_completed(conn: &Connection, work_id: &str) -> Result<bool> {
        let done: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM events
                            WHERE event_type = 'work_completed'
                              AND json_extract(data, '$.work_id') = ?1)",
            params![work_id],
            |row| row.get(0),
        )?;
        Ok(done)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
