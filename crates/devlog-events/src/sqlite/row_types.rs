//! Database row types for mapping between `SQLite` rows and Rust structs.
//!
//! These represent the raw row shape. Conversion to the typed [`Event`]
//! happens in [`EventRow::into_event`].

use serde_json::Value;

use crate::errors::{EventStoreError, Result};
use crate::types::{EntityType, Event, EventData, EventType};

/// Column list shared by every query that maps through [`EventRow`].
pub(crate) const EVENT_COLUMNS: &str =
    "id, event_id, timestamp, session_id, slice_id, event_type, entity_type, entity_id, data, tags";

/// Raw row from the `events` table.
#[derive(Clone, Debug)]
pub struct EventRow {
    /// Insertion order (`INTEGER PRIMARY KEY`).
    pub id: i64,
    /// Event ID.
    pub event_id: String,
    /// Stored timestamp text.
    pub timestamp: String,
    /// Session ID.
    pub session_id: String,
    /// Slice ID.
    pub slice_id: Option<String>,
    /// Event type string.
    pub event_type: String,
    /// Entity type string.
    pub entity_type: String,
    /// Entity ID.
    pub entity_id: Option<String>,
    /// Payload JSON text.
    pub data: Option<String>,
    /// Tags as a JSON array string.
    pub tags: Option<String>,
}

impl EventRow {
    /// Map a row selected with [`EVENT_COLUMNS`] (offset by `start`).
    pub(crate) fn from_row_at(row: &rusqlite::Row<'_>, start: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(start)?,
            event_id: row.get(start + 1)?,
            timestamp: row.get(start + 2)?,
            session_id: row.get(start + 3)?,
            slice_id: row.get(start + 4)?,
            event_type: row.get(start + 5)?,
            entity_type: row.get(start + 6)?,
            entity_id: row.get(start + 7)?,
            data: row.get(start + 8)?,
            tags: row.get(start + 9)?,
        })
    }

    /// Decode into a typed [`Event`].
    pub fn into_event(self) -> Result<Event> {
        let event_type: EventType = self
            .event_type
            .parse()
            .map_err(|_| EventStoreError::UnknownEventType(self.event_type.clone()))?;
        let entity_type: EntityType = self
            .entity_type
            .parse()
            .map_err(|_| EventStoreError::UnknownEntityType(self.entity_type.clone()))?;
        let timestamp = devlog_core::time::parse_timestamp(&self.timestamp)
            .ok_or_else(|| EventStoreError::InvalidTimestamp(self.timestamp.clone()))?;

        let body = match self.data.as_deref() {
            Some(raw) => serde_json::from_str(raw)?,
            None => Value::Null,
        };
        let body = if body.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            body
        };
        let data = EventData::from_value(event_type, body)?;

        let tags = match self.tags.as_deref() {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)?,
            None => Vec::new(),
        };

        Ok(Event {
            insertion_order: self.id,
            event_id: self.event_id.into(),
            timestamp,
            session_id: self.session_id.into(),
            slice_id: self.slice_id.map(Into::into),
            entity_type,
            entity_id: self.entity_id,
            data,
            tags,
        })
    }
}

/// One file path aggregated over its create/modify events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileActivityRow {
    /// File path.
    pub path: String,
    /// Number of create/modify events.
    pub edits: i64,
    /// Latest event timestamp.
    pub last: String,
}

/// Distinct counts over a time window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowStats {
    /// Distinct session IDs.
    pub sessions: i64,
    /// Distinct non-null slice IDs.
    pub slices: i64,
    /// Events.
    pub events: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn row(event_type: &str, entity_type: &str, data: Option<&str>) -> EventRow {
        EventRow {
            id: 7,
            event_id: "0192-evt".into(),
            timestamp: "2026-02-01T10:00:00.000Z".into(),
            session_id: "sess-1".into(),
            slice_id: None,
            event_type: event_type.into(),
            entity_type: entity_type.into(),
            entity_id: Some("sess-1".into()),
            data: data.map(Into::into),
            tags: Some(r#"["session","stop"]"#.into()),
        }
    }

    #[test]
    fn decodes_stopped_row_with_null_data() {
        let event = row("session_stopped", "session", None).into_event().unwrap();
        assert_eq!(event.event_type(), EventType::SessionStopped);
        assert_eq!(event.insertion_order, 7);
        assert_eq!(event.tags, vec!["session", "stop"]);
    }

    #[test]
    fn legacy_timestamp_accepted() {
        let mut r = row("session_stopped", "session", Some("{}"));
        r.timestamp = "2025-11-30 08:15:00".into();
        assert!(r.into_event().is_ok());
    }

    #[test]
    fn unknown_types_are_errors() {
        assert_matches!(
            row("session_paused", "session", Some("{}")).into_event(),
            Err(EventStoreError::UnknownEventType(t)) if t == "session_paused"
        );
        assert_matches!(
            row("session_stopped", "galaxy", Some("{}")).into_event(),
            Err(EventStoreError::UnknownEntityType(_))
        );
    }

    #[test]
    fn bad_timestamp_is_error() {
        let mut r = row("session_stopped", "session", Some("{}"));
        r.timestamp = "yesterday".into();
        assert_matches!(r.into_event(), Err(EventStoreError::InvalidTimestamp(_)));
    }
}
