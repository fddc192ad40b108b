//! Slice derivation.
//!
//! A slice is the span of events following one `slice_started` for a session,
//! up to the next `slice_started` for the same session. Nothing records
//! "the current slice"; it is always read back from the log.

use devlog_core::text::truncate_chars;
use devlog_core::{SessionId, SliceId};

use crate::errors::Result;
use crate::sqlite::repositories::event::EventQuery;
use crate::store::ProjectStore;
use crate::types::payloads::SliceStartedPayload;
use crate::types::{EntityType, Event, EventType, NewEvent};

/// Maximum stored characters of a prompt preview.
pub const PROMPT_PREVIEW_MAX_CHARS: usize = 100;

/// The open slice for `session`, if it has started one.
pub fn current_slice(store: &ProjectStore, session: &SessionId) -> Result<Option<SliceId>> {
    let latest = store.first(
        &EventQuery::new()
            .session(session.as_str())
            .types(&[EventType::SliceStarted])
            .newest_first(),
    )?;
    Ok(latest.and_then(|e| e.slice_id))
}

/// Newest `slice_started` across every session.
pub fn latest_slice(store: &ProjectStore) -> Result<Option<Event>> {
    store.first(
        &EventQuery::new()
            .types(&[EventType::SliceStarted])
            .newest_first(),
    )
}

/// Open a new slice for `session`; it becomes the session's current slice.
pub fn start_slice(store: &ProjectStore, session: &SessionId, prompt: &str) -> Result<Event> {
    let slice_id = SliceId::new();
    let event = NewEvent::new(
        session.clone(),
        Some(slice_id.clone()),
        EntityType::Slice,
        Some(slice_id.into_inner()),
        SliceStartedPayload {
            prompt_preview: truncate_chars(prompt, PROMPT_PREVIEW_MAX_CHARS).to_owned(),
        },
        &["slice", "start"],
    );
    store.append(&event)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
