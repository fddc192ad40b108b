//! Hook ingestion.
//!
//! The host delivers one JSON object per trigger. Its kind is inferred from
//! which keys are present, so it is decoded once into [`HookMessage`] and
//! every later step matches on that enum.

use std::path::{Path, PathBuf};

use devlog_core::{EventId, SessionId};
use serde_json::{Map, Value};

use crate::classify::{ActionRecord, classify};
use crate::errors::Result;
use crate::slice::{current_slice, start_slice};
use crate::store::ProjectStore;
use crate::types::payloads::SessionStoppedPayload;
use crate::types::{EntityType, NewEvent};

/// One decoded hook payload.
#[derive(Clone, Debug, PartialEq)]
pub enum HookMessage {
    /// The user submitted a prompt.
    InteractionStarted {
        /// Producing session.
        session_id: SessionId,
        /// Host working directory.
        cwd: Option<PathBuf>,
        /// Prompt text (empty if absent).
        prompt: String,
    },
    /// The assistant finished a tool call.
    ActionCompleted {
        /// Producing session.
        session_id: SessionId,
        /// Host working directory.
        cwd: Option<PathBuf>,
        /// The tool record.
        action: ActionRecord,
    },
    /// The session ended.
    SessionEnded {
        /// Producing session.
        session_id: SessionId,
        /// Host working directory.
        cwd: Option<PathBuf>,
    },
    /// Empty, malformed, or missing a session.
    Unrecognized,
}

impl HookMessage {
    /// Decode raw stdin. Never fails; bad input is [`HookMessage::Unrecognized`].
    pub fn decode(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Unrecognized;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(obj)) => Self::from_object(obj),
            Ok(_) => Self::Unrecognized,
            Err(e) => {
                tracing::debug!(error = %e, "hook input is not JSON");
                Self::Unrecognized
            }
        }
    }

    fn from_object(mut obj: Map<String, Value>) -> Self {
        let Some(session_id) = obj
            .get("session_id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(SessionId::from)
        else {
            return Self::Unrecognized;
        };
        let cwd = obj
            .get("cwd")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        if let Some(prompt) = obj.get("prompt") {
            return Self::InteractionStarted {
                session_id,
                cwd,
                prompt: prompt.as_str().unwrap_or_default().to_owned(),
            };
        }
        if let Some(tool_name) = obj.get("tool_name") {
            let Some(tool_name) = tool_name.as_str().filter(|t| !t.is_empty()).map(str::to_owned)
            else {
                return Self::Unrecognized;
            };
            return Self::ActionCompleted {
                session_id,
                cwd,
                action: ActionRecord {
                    tool_name,
                    tool_input: obj.remove("tool_input").unwrap_or(Value::Null),
                    tool_response: obj.remove("tool_response").filter(|v| !v.is_null()),
                },
            };
        }
        Self::SessionEnded { session_id, cwd }
    }

    /// Host working directory, if given.
    pub fn cwd(&self) -> Option<&Path> {
        match self {
            Self::InteractionStarted { cwd, .. }
            | Self::ActionCompleted { cwd, .. }
            | Self::SessionEnded { cwd, .. } => cwd.as_deref(),
            Self::Unrecognized => None,
        }
    }

    /// Producing session, if any.
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::InteractionStarted { session_id, .. }
            | Self::ActionCompleted { session_id, .. }
            | Self::SessionEnded { session_id, .. } => Some(session_id),
            Self::Unrecognized => None,
        }
    }
}

/// Why an action produced no event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// The classifier discarded it.
    Noise,
    /// The session has no open slice.
    NoSlice,
}

/// What [`record`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// One event was appended.
    Appended(EventId),
    /// An action was seen but not recorded.
    Dropped(DropReason),
    /// The message carried nothing to record.
    Ignored,
}

/// Apply one hook message to the project's store.
pub fn record(store: &ProjectStore, message: &HookMessage) -> Result<DispatchOutcome> {
    match message {
        HookMessage::InteractionStarted {
            session_id, prompt, ..
        } => {
            let event = start_slice(store, session_id, prompt)?;
            Ok(DispatchOutcome::Appended(event.event_id))
        }
        HookMessage::ActionCompleted {
            session_id, action, ..
        } => {
            let Some(classified) = classify(action) else {
                return Ok(DispatchOutcome::Dropped(DropReason::Noise));
            };
            let Some(slice_id) = current_slice(store, session_id)? else {
                tracing::debug!(session_id = %session_id, tool = %action.tool_name, "no open slice, action dropped");
                return Ok(DispatchOutcome::Dropped(DropReason::NoSlice));
            };
            let event = store.append(&classified.into_event(session_id.clone(), slice_id))?;
            Ok(DispatchOutcome::Appended(event.event_id))
        }
        HookMessage::SessionEnded { session_id, .. } => {
            let event = store.append(&NewEvent::new(
                session_id.clone(),
                None,
                EntityType::Session,
                Some(session_id.to_string()),
                SessionStoppedPayload {},
                &["session", "stop"],
            ))?;
            Ok(DispatchOutcome::Appended(event.event_id))
        }
        HookMessage::Unrecognized => Ok(DispatchOutcome::Ignored),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::repositories::event::EventQuery;
    use crate::types::EventType;
    use assert_matches::assert_matches;

    #[test]
    fn decode_by_key_presence() {
        assert_matches!(
            HookMessage::decode(r#"{"session_id":"s","prompt":"hi","tool_name":"Bash"}"#),
            HookMessage::InteractionStarted { prompt, .. } if prompt == "hi"
        );
        assert_matches!(
            HookMessage::decode(r#"{"session_id":"s","tool_name":"Bash","tool_input":{"command":"make"}}"#),
            HookMessage::ActionCompleted { action, .. } if action.tool_name == "Bash"
        );
        assert_matches!(
            HookMessage::decode(r#"{"session_id":"s","cwd":"/w/proj"}"#),
            HookMessage::SessionEnded { cwd: Some(p), .. } if p == Path::new("/w/proj")
        );
    }

    #[test]
    fn decode_null_prompt_is_empty_interaction() {
        assert_matches!(
            HookMessage::decode(r#"{"session_id":"s","prompt":null}"#),
            HookMessage::InteractionStarted { prompt, .. } if prompt.is_empty()
        );
    }

    #[test]
    fn decode_rejects_bad_input() {
        for raw in ["", "   ", "not json", "[1,2]", "\"str\"", "{}", r#"{"session_id":7}"#,
                    r#"{"session_id":"s","tool_name":""}"#] {
            assert_eq!(HookMessage::decode(raw), HookMessage::Unrecognized, "{raw}");
        }
    }

    #[test]
    fn cwd_and_session_accessors() {
        let msg = HookMessage::decode(r#"{"session_id":"s1","prompt":"x","cwd":"/a/b"}"#);
        assert_eq!(msg.cwd(), Some(Path::new("/a/b")));
        assert_eq!(msg.session_id().map(SessionId::as_str), Some("s1"));
        assert!(HookMessage::Unrecognized.cwd().is_none());
    }

    #[test]
    fn action_without_slice_is_dropped() {
        let store = ProjectStore::open_in_memory().unwrap();
        let msg = HookMessage::decode(
            r#"{"session_id":"s","tool_name":"Write","tool_input":{"file_path":"/a","content":"x"}}"#,
        );
        assert_eq!(record(&store, &msg).unwrap(), DispatchOutcome::Dropped(DropReason::NoSlice));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn prompt_then_action_shares_slice() {
        let store = ProjectStore::open_in_memory().unwrap();
        record(&store, &HookMessage::decode(r#"{"session_id":"s","prompt":"go"}"#)).unwrap();
        let outcome = record(
            &store,
            &HookMessage::decode(r#"{"session_id":"s","tool_name":"Bash","tool_input":{"command":"cargo build"},"tool_response":{"error":"boom"}}"#),
        )
        .unwrap();
        let DispatchOutcome::Appended(id) = outcome else {
            panic!("expected append, got {outcome:?}");
        };
        let events = store.query(&EventQuery::new()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_id, id);
        assert_eq!(events[0].slice_id, events[1].slice_id);
        assert_eq!(events[1].tags, vec!["command", "build"]);
    }

    #[test]
    fn noise_is_dropped_even_with_slice() {
        let store = ProjectStore::open_in_memory().unwrap();
        record(&store, &HookMessage::decode(r#"{"session_id":"s","prompt":"go"}"#)).unwrap();
        let msg = HookMessage::decode(r#"{"session_id":"s","tool_name":"Read","tool_input":{"file_path":"/a"}}"#);
        assert_eq!(record(&store, &msg).unwrap(), DispatchOutcome::Dropped(DropReason::Noise));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn session_end_always_recorded_without_slice() {
        let store = ProjectStore::open_in_memory().unwrap();
        record(&store, &HookMessage::decode(r#"{"session_id":"s","prompt":"go"}"#)).unwrap();
        record(&store, &HookMessage::decode(r#"{"session_id":"s"}"#)).unwrap();
        let stop = store
            .first(&EventQuery::new().types(&[EventType::SessionStopped]))
            .unwrap()
            .unwrap();
        assert!(stop.slice_id.is_none());
        assert_eq!(stop.entity_id.as_deref(), Some("s"));
        assert_eq!(stop.tags, vec!["session", "stop"]);
    }

    #[test]
    fn unrecognized_is_ignored() {
        let store = ProjectStore::open_in_memory().unwrap();
        assert_eq!(record(&store, &HookMessage::Unrecognized).unwrap(), DispatchOutcome::Ignored);
        assert_eq!(store.count().unwrap(), 0);
    }
}
