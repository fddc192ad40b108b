//! Error types for the event store subsystem.
//!
//! [`EventStoreError`] is the error type returned by every store, projection
//! and view operation.

use thiserror::Error;

/// Errors that can occur during event store operations.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Filesystem error while preparing the events directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An event with this ID already exists in the store.
    #[error("duplicate event: {0}")]
    DuplicateEvent(String),

    /// A stored row carries an event type outside the known set.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// A stored row carries an entity type outside the known set.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A stored timestamp could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// No queued or blocked work item matches the given ID prefix.
    #[error("no work item found matching: {0}")]
    WorkItemNotFound(String),
}

/// Convenience type alias for event store results.
pub type Result<T> = std::result::Result<T, EventStoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
