//! Aggregate reads: file activity, window counts, type histogram.

use std::fmt::Write as _;

use rusqlite::types::ToSql;
use rusqlite::{Connection, params};

use crate::errors::Result;
use crate::sqlite::row_types::{FileActivityRow, WindowStats};
use crate::types::EventType;

use super::type_list;

/// Activity repository: stateless, every method takes `&Connection`.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Files created or modified, grouped by path, most recently touched first.
    pub fn file_activity(
        conn: &Connection,
        since: Option<&str>,
        limit: u32,
    ) -> Result<Vec<FileActivityRow>> {
        let mut sql = format!(
            "SELECT entity_id, COUNT(*) AS edits, MAX(timestamp) AS last
             FROM events
             WHERE event_type IN ({})
               AND entity_id IS NOT NULL",
            type_list(EventType::is_file_change)
        );
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(since) = since {
            params.push(Box::new(since.to_owned()));
            let _ = write!(sql, " AND timestamp > ?{}", params.len());
        }
        let _ = write!(sql, " GROUP BY entity_id ORDER BY last DESC, MAX(id) DESC LIMIT {limit}");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn ToSql> = params.iter().map(Box::as_ref).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                Ok(FileActivityRow {
                    path: row.get(0)?,
                    edits: row.get(1)?,
                    last: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Distinct sessions, distinct non-null slices, and events after `since`.
    pub fn window_stats(conn: &Connection, since: &str) -> Result<WindowStats> {
        let stats = conn.query_row(
            "SELECT COUNT(DISTINCT session_id), COUNT(DISTINCT slice_id), COUNT(*)
             FROM events WHERE timestamp > ?1",
            params![since],
            |row| {
                Ok(WindowStats {
                    sessions: row.get(0)?,
                    slices: row.get(1)?,
                    events: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Event count per type, largest first.
    pub fn type_histogram(conn: &Connection) -> Result<Vec<(String, i64)>> {
        let mut stmt = conn.prepare(
            "SELECT event_type, COUNT(*) AS n FROM events
             GROUP BY event_type ORDER BY n DESC, event_type ASC",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::connection::{ConnectionConfig, open_in_memory};

    fn setup() -> Connection {
        let conn = open_in_memory(&ConnectionConfig::default()).unwrap();
        conn.execute_batch(
            "INSERT INTO events (event_id, timestamp, session_id, slice_id, event_type, entity_type, entity_id, data, tags) VALUES
               ('e1', '2026-03-01T09:00:00.000Z', 's1', 'x1', 'slice_started', 'slice', 'x1', '{}', '[]'),
               ('e2', '2026-03-01T09:01:00.000Z', 's1', 'x1', 'file_created', 'file', '/src/a.rs', '{\"lines\":3}', '[]'),
               ('e3', '2026-03-01T09:02:00.000Z', 's1', 'x1', 'file_modified', 'file', '/src/a.rs', '{\"old_length\":1,\"new_length\":2}', '[]'),
               ('e4', '2026-03-08T09:00:00.000Z', 's2', 'x2', 'file_modified', 'file', '/src/b.rs', '{\"old_length\":1,\"new_length\":2}', '[]'),
               ('e5', '2026-03-08T10:00:00.000Z', 'cli', NULL, 'work_queued', 'work', 'e5', '{}', '[]');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn files_grouped_newest_first() {
        let conn = setup();
        let files = ActivityRepo::file_activity(&conn, None, 10).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "/src/b.rs");
        assert_eq!(files[1].path, "/src/a.rs");
        assert_eq!(files[1].edits, 2);
        assert_eq!(files[1].last, "2026-03-01T09:02:00.000Z");
    }

    #[test]
    fn files_windowed() {
        let conn = setup();
        let files = ActivityRepo::file_activity(&conn, Some("2026-03-05T00:00:00.000Z"), 10).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "/src/b.rs");
    }

    #[test]
    fn stats_count_distinct_non_null_slices() {
        let conn = setup();
        let all = ActivityRepo::window_stats(&conn, "2000-01-01T00:00:00.000Z").unwrap();
        assert_eq!(all, WindowStats { sessions: 3, slices: 2, events: 5 });
        let recent = ActivityRepo::window_stats(&conn, "2026-03-05T00:00:00.000Z").unwrap();
        assert_eq!(recent, WindowStats { sessions: 2, slices: 1, events: 2 });
    }

    #[test]
    fn histogram_largest_first() {
        let conn = setup();
        let hist = ActivityRepo::type_histogram(&conn).unwrap();
        assert_eq!(hist[0], ("file_modified".to_owned(), 2));
        assert_eq!(hist.len(), 4);
    }
}
