//! The persisted [`Event`] and its pre-insert form [`NewEvent`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use devlog_core::{EventId, SessionId, SliceId};
use serde::{Deserialize, Serialize};

use super::generated::{EventData, EventType};

/// What an event is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// An interaction; the entity ID is the slice ID.
    Slice,
    /// A file path.
    File,
    /// A command's first token.
    Command,
    /// A fetched URL.
    Url,
    /// A search query.
    Search,
    /// A subtask kind.
    Task,
    /// The todo list (no entity ID).
    Todos,
    /// An interactive session.
    Session,
    /// A work item; the entity ID is the item's event ID.
    Work,
    /// A handoff; the entity ID is its own event ID.
    Handoff,
}

impl EntityType {
    /// Wire string stored in the `entity_type` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slice => "slice",
            Self::File => "file",
            Self::Command => "command",
            Self::Url => "url",
            Self::Search => "search",
            Self::Task => "task",
            Self::Todos => "todos",
            Self::Session => "session",
            Self::Work => "work",
            Self::Handoff => "handoff",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slice" => Ok(Self::Slice),
            "file" => Ok(Self::File),
            "command" => Ok(Self::Command),
            "url" => Ok(Self::Url),
            "search" => Ok(Self::Search),
            "task" => Ok(Self::Task),
            "todos" => Ok(Self::Todos),
            "session" => Ok(Self::Session),
            "work" => Ok(Self::Work),
            "handoff" => Ok(Self::Handoff),
            _ => Err(format!("unknown entity type: {s}")),
        }
    }
}

/// An event ready to be appended.
///
/// The store assigns `timestamp` and `insertion_order`; everything else is
/// fixed here, including the event ID, so callers can use it as an entity ID
/// before the row exists.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    /// Pre-generated UUID v7.
    pub event_id: EventId,
    /// Producing session, or `cli`.
    pub session_id: SessionId,
    /// Open interaction, if any.
    pub slice_id: Option<SliceId>,
    /// Entity kind.
    pub entity_type: EntityType,
    /// Entity key.
    pub entity_id: Option<String>,
    /// Typed payload; determines the event type.
    pub data: EventData,
    /// Filter labels.
    pub tags: Vec<String>,
}

impl NewEvent {
    /// Build an event with a fresh ID.
    pub fn new(
        session_id: SessionId,
        slice_id: Option<SliceId>,
        entity_type: EntityType,
        entity_id: Option<String>,
        data: impl Into<EventData>,
        tags: &[&str],
    ) -> Self {
        Self {
            event_id: EventId::new(),
            session_id,
            slice_id,
            entity_type,
            entity_id,
            data: data.into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    /// Event type implied by the payload.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.data.event_type()
    }
}

/// A stored event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Store-local sequence; tiebreaker for equal timestamps.
    pub insertion_order: i64,
    /// Globally unique ID.
    pub event_id: EventId,
    /// Store-assigned creation time.
    pub timestamp: DateTime<Utc>,
    /// Producing session, or `cli`.
    pub session_id: SessionId,
    /// Owning interaction, if any.
    pub slice_id: Option<SliceId>,
    /// Entity kind.
    pub entity_type: EntityType,
    /// Entity key.
    pub entity_id: Option<String>,
    /// Typed payload.
    pub data: EventData,
    /// Filter labels.
    pub tags: Vec<String>,
}

impl Event {
    /// Event type implied by the payload.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        self.data.event_type()
    }
}
