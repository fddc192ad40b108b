//! Work queue projection.
//!
//! Queue and block write `work_queued` / `work_blocked` events from the
//! command line. An item is open until a `work_completed` event carries its
//! event ID in `data.work_id`. Status is never stored anywhere else.

use chrono::{DateTime, Utc};
use devlog_core::{EventId, SessionId};

use crate::errors::{EventStoreError, Result};
use crate::sqlite::repositories::work::WorkRepo;
use crate::sqlite::row_types::EventRow;
use crate::store::ProjectStore;
use crate::types::payloads::{WorkBlockedPayload, WorkCompletedPayload, WorkQueuedPayload};
use crate::types::{EntityType, Event, EventData, NewEvent};

/// Status of a work item at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkStatus {
    /// Queued.
    Pending,
    /// Recorded as blocked.
    Blocked,
}

/// Which items [`list`] returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkFilter {
    /// Items without a completion.
    Open,
    /// Every item, completed or not.
    All,
}

/// A derived work item.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkItem {
    /// Event ID of the queue/block event.
    pub id: EventId,
    /// When it was recorded.
    pub created: DateTime<Utc>,
    /// Pending or blocked.
    pub status: WorkStatus,
    /// What needs doing.
    pub description: String,
    /// Extra context given at queue time.
    pub context: Option<String>,
    /// Block reason.
    pub reason: Option<String>,
    /// Whether a completion references this item.
    pub completed: bool,
}

impl WorkItem {
    fn from_row(row: EventRow, completed: bool) -> Result<Self> {
        let event = row.into_event()?;
        let (status, description, context, reason) = match event.data {
            EventData::WorkQueued(p) => (WorkStatus::Pending, p.description, p.context, None),
            EventData::WorkBlocked(p) => (WorkStatus::Blocked, p.description, None, Some(p.reason)),
            other => return Err(EventStoreError::UnknownEventType(other.event_type().to_string())),
        };
        Ok(Self {
            id: event.event_id,
            created: event.timestamp,
            status,
            description,
            context,
            reason,
            completed,
        })
    }
}

/// Result of [`complete`].
#[derive(Clone, Debug, PartialEq)]
pub enum CompleteOutcome {
    /// A completion event was appended.
    Completed {
        /// The item, as it was before completion.
        item: WorkItem,
        /// The appended `work_completed` event.
        completion: Event,
    },
    /// The item already had a completion; nothing was appended.
    AlreadyCompleted {
        /// The item.
        item: WorkItem,
    },
}

impl CompleteOutcome {
    /// The matched item.
    pub fn item(&self) -> &WorkItem {
        match self {
            Self::Completed { item, .. } | Self::AlreadyCompleted { item } => item,
        }
    }
}

/// Append a pending work item.
pub fn queue(store: &ProjectStore, description: &str, context: Option<&str>) -> Result<Event> {
    append_item(
        store,
        WorkQueuedPayload::new(description, context.map(str::to_owned)),
        &["work", "queued"],
    )
}

/// Append a blocked work item.
pub fn block(store: &ProjectStore, description: &str, reason: &str) -> Result<Event> {
    append_item(
        store,
        WorkBlockedPayload::new(description, reason),
        &["work", "blocked"],
    )
}

fn append_item(store: &ProjectStore, data: impl Into<EventData>, tags: &[&str]) -> Result<Event> {
    let mut event = NewEvent::new(SessionId::cli(), None, EntityType::Work, None, data, tags);
    event.entity_id = Some(event.event_id.to_string());
    store.append(&event)
}

/// Complete the most recent work item whose ID starts with `prefix`.
pub fn complete(store: &ProjectStore, prefix: &str) -> Result<CompleteOutcome> {
    if prefix.is_empty() {
        return Err(EventStoreError::WorkItemNotFound(String::new()));
    }
    let (row, done) = WorkRepo::find_by_prefix(store.conn(), prefix)?
        .ok_or_else(|| EventStoreError::WorkItemNotFound(prefix.to_owned()))?;
    let item = WorkItem::from_row(row, done)?;
    if done {
        tracing::info!(work_id = %item.id, "work item already completed");
        return Ok(CompleteOutcome::AlreadyCompleted { item });
    }

    let completion = store.append(&NewEvent::new(
        SessionId::cli(),
        None,
        EntityType::Work,
        Some(item.id.to_string()),
        WorkCompletedPayload {
            work_id: item.id.to_string(),
            description: item.description.clone(),
        },
        &["work", "completed"],
    ))?;
    Ok(CompleteOutcome::Completed { item, completion })
}

/// Work items newest first.
pub fn list(store: &ProjectStore, filter: WorkFilter, limit: u32) -> Result<Vec<WorkItem>> {
    WorkRepo::list(store.conn(), filter == WorkFilter::Open, limit)?
        .into_iter()
        .map(|(row, done)| WorkItem::from_row(row, done))
        .collect()
}

/// Whether no completion references `item_id`.
pub fn is_open(store: &ProjectStore, item_id: &str) -> Result<bool> {
    Ok(!WorkRepo::is_completed(store.conn(), item_id)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
