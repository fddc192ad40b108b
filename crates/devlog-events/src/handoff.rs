//! Session handoffs: free-form summaries left for the next session.

use devlog_core::SessionId;

use crate::errors::Result;
use crate::slice::latest_slice;
use crate::store::ProjectStore;
use crate::types::{EntityType, Event, HandoffPayload, NewEvent};

/// Record a handoff.
///
/// It is attributed to the session of the project's newest slice, or to the
/// `cli` session when no slice exists. The entity ID is the handoff's own
/// event ID.
pub fn record_handoff(store: &ProjectStore, payload: HandoffPayload) -> Result<Event> {
    let session_id = latest_slice(store)?.map_or_else(SessionId::cli, |e| e.session_id);
    let mut event = NewEvent::new(session_id, None, EntityType::Handoff, None, payload, &["handoff"]);
    event.entity_id = Some(event.event_id.to_string());
    store.append(&event)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::slice::start_slice;
    use crate::types::{EventData, EventType};
    use serde_json::json;

    fn payload(raw: serde_json::Value) -> HandoffPayload {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn attributed_to_cli_without_slices() {
        let store = ProjectStore::open_in_memory().unwrap();
        let event = record_handoff(&store, payload(json!({"goal": "ship"}))).unwrap();
        assert_eq!(event.session_id.as_str(), "cli");
        assert!(event.slice_id.is_none());
        assert_eq!(event.event_type(), EventType::SessionHandoff);
        assert_eq!(event.entity_id.as_deref(), Some(event.event_id.as_str()));
        assert_eq!(event.tags, vec!["handoff"]);
    }

    #[test]
    fn attributed_to_newest_slice_session() {
        let store = ProjectStore::open_in_memory().unwrap();
        start_slice(&store, &SessionId::from("older"), "a").unwrap();
        start_slice(&store, &SessionId::from("newer"), "b").unwrap();
        let event = record_handoff(&store, payload(json!({"next": ["x"]}))).unwrap();
        assert_eq!(event.session_id.as_str(), "newer");
    }

    #[test]
    fn unknown_keys_survive_storage() {
        let store = ProjectStore::open_in_memory().unwrap();
        let event = record_handoff(
            &store,
            payload(json!({"goal": "g", "done": ["a", "b"], "mood": {"level": 3}})),
        )
        .unwrap();
        let read = store.get(event.event_id.as_str()).unwrap().unwrap();
        let EventData::SessionHandoff(p) = read.data else {
            panic!("expected handoff payload");
        };
        assert_eq!(p.extra.get("mood"), Some(&json!({"level": 3})));
        assert_eq!(p.done.unwrap().items(), vec!["a", "b"]);
    }
}
