//! Typed payload definitions for each [`EventType`](super::EventType) variant.
//!
//! Field names are `snake_case` on the wire, matching the JSON already
//! present in existing project logs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status recorded on `work_queued` payloads.
pub const STATUS_PENDING: &str = "pending";
/// Status recorded on `work_blocked` payloads.
pub const STATUS_BLOCKED: &str = "blocked";

// ── Slices and sessions ─────────────────────────────────────────────────────

/// Payload for `slice_started`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceStartedPayload {
    /// First 100 characters of the triggering prompt.
    #[serde(default)]
    pub prompt_preview: String,
}

/// Payload for `session_stopped` (always the empty object).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStoppedPayload {}

// ── Actions ─────────────────────────────────────────────────────────────────

/// Payload for `file_created`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreatedPayload {
    /// Newline-separated segment count of the written content.
    pub lines: u64,
}

/// Payload for `file_modified`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModifiedPayload {
    /// Length of the replaced text, in characters.
    pub old_length: u64,
    /// Length of the replacement text, in characters.
    pub new_length: u64,
}

/// Payload for `command_executed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandExecutedPayload {
    /// Command text, at most 200 characters.
    #[serde(default)]
    pub command: String,
    /// Whether the response carried no error.
    pub success: bool,
}

/// Payload for `resource_fetched`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFetchedPayload {
    /// Purpose of the fetch, at most 100 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Payload for `web_searched`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSearchedPayload {
    /// Full query text.
    #[serde(default)]
    pub query: String,
}

/// Payload for `task_spawned`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpawnedPayload {
    /// Short task description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Task prompt, at most 200 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Payload for `todos_updated`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodosUpdatedPayload {
    /// Total items in the list.
    pub count: u64,
    /// Items marked `in_progress`.
    pub in_progress: u64,
    /// Items marked `completed`.
    pub completed: u64,
}

// ── Work queue ──────────────────────────────────────────────────────────────

/// Payload for `work_queued`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkQueuedPayload {
    /// What needs doing.
    pub description: String,
    /// Optional extra context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Always [`STATUS_PENDING`].
    pub status: String,
}

impl WorkQueuedPayload {
    /// A pending item.
    pub fn new(description: impl Into<String>, context: Option<String>) -> Self {
        Self {
            description: description.into(),
            context,
            status: STATUS_PENDING.to_owned(),
        }
    }
}

/// Payload for `work_blocked`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBlockedPayload {
    /// What is blocked.
    pub description: String,
    /// Why it is blocked.
    pub reason: String,
    /// Always [`STATUS_BLOCKED`].
    pub status: String,
}

impl WorkBlockedPayload {
    /// A blocked item.
    pub fn new(description: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            reason: reason.into(),
            status: STATUS_BLOCKED.to_owned(),
        }
    }
}

/// Payload for `work_completed`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCompletedPayload {
    /// `event_id` of the completed `work_queued`/`work_blocked` event.
    pub work_id: String,
    /// Description copied from the completed item.
    #[serde(default)]
    pub description: String,
}

// ── Handoff ─────────────────────────────────────────────────────────────────

/// A handoff section: either a list of entries or a single opaque value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandoffField {
    /// A JSON array.
    List(Vec<Value>),
    /// Anything else (usually a string).
    Single(Value),
}

impl HandoffField {
    /// Entries rendered as text. Strings are shown bare, other values as JSON.
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::List(values) => values.iter().map(value_text).collect(),
            Self::Single(value) => vec![value_text(value)],
        }
    }

    /// All entries joined into one line.
    pub fn joined(&self) -> String {
        self.items().join("; ")
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Payload for `session_handoff`.
///
/// The known sections are typed; any other keys are preserved verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandoffPayload {
    /// What the session was trying to achieve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<HandoffField>,
    /// What got done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<HandoffField>,
    /// Decisions taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decisions: Option<HandoffField>,
    /// Open questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<HandoffField>,
    /// Suggested next steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<HandoffField>,
    /// Free-form context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<HandoffField>,
    /// Unknown keys, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HandoffPayload {
    /// The known sections in display order, skipping absent ones.
    pub fn sections(&self) -> Vec<(&'static str, &HandoffField)> {
        [
            ("Done", self.done.as_ref()),
            ("Decisions", self.decisions.as_ref()),
            ("Open", self.open.as_ref()),
            ("Next", self.next.as_ref()),
            ("Context", self.context.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, field)| field.map(|f| (label, f)))
        .collect()
    }
}
