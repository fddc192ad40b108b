//! Action classification: external tool records → canonical events.
//!
//! [`classify`] is a pure function. It sees one action record and either
//! returns the event it maps to or `None` for actions that are not worth
//! recording (read-only tools, unknown tools, noisy shell idioms).

use devlog_core::text::truncate_chars;
use devlog_core::{SessionId, SliceId};
use serde::Deserialize;
use serde_json::Value;

use crate::types::payloads::{
    CommandExecutedPayload, FileCreatedPayload, FileModifiedPayload, ResourceFetchedPayload,
    TaskSpawnedPayload, TodosUpdatedPayload, WebSearchedPayload,
};
use crate::types::{EntityType, EventData, NewEvent};

/// Maximum stored characters of a shell command.
pub const COMMAND_MAX_CHARS: usize = 200;
/// Maximum stored characters of a fetch purpose.
pub const FETCH_PROMPT_MAX_CHARS: usize = 100;
/// Maximum stored characters of a subtask prompt.
pub const TASK_PROMPT_MAX_CHARS: usize = 200;

/// First command tokens that are never recorded.
const NOISY_COMMANDS: &[&str] = &["ls", "cat", "echo"];

/// One "action performed" record as delivered by the host.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ActionRecord {
    /// Tool name, e.g. `Write` or `Bash`.
    pub tool_name: String,
    /// Tool arguments.
    #[serde(default)]
    pub tool_input: Value,
    /// Tool result, when the host reports one.
    #[serde(default)]
    pub tool_response: Option<Value>,
}

/// A classified action, not yet bound to a session or slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Classified {
    /// Entity kind.
    pub entity_type: EntityType,
    /// Entity key.
    pub entity_id: Option<String>,
    /// Typed payload.
    pub data: EventData,
    /// Filter labels, never empty strings.
    pub tags: Vec<String>,
}

impl Classified {
    fn new(
        entity_type: EntityType,
        entity_id: Option<String>,
        data: impl Into<EventData>,
        tags: &[&str],
    ) -> Self {
        Self {
            entity_type,
            entity_id,
            data: data.into(),
            tags: tags
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| (*t).to_owned())
                .collect(),
        }
    }

    /// Bind to a session and slice, producing an appendable event.
    pub fn into_event(self, session_id: SessionId, slice_id: SliceId) -> NewEvent {
        NewEvent {
            event_id: devlog_core::EventId::new(),
            session_id,
            slice_id: Some(slice_id),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            data: self.data,
            tags: self.tags,
        }
    }
}

/// Map an action record to its canonical event, or `None` for noise.
pub fn classify(action: &ActionRecord) -> Option<Classified> {
    let input = &action.tool_input;
    match action.tool_name.as_str() {
        "Write" => {
            let lines = str_field(input, "content").map_or(0, |c| c.split('\n').count() as u64);
            Some(Classified::new(
                EntityType::File,
                owned_field(input, "file_path"),
                FileCreatedPayload { lines },
                &["file", "write"],
            ))
        }
        "Edit" => Some(Classified::new(
            EntityType::File,
            owned_field(input, "file_path"),
            FileModifiedPayload {
                old_length: char_len(input, "old_string"),
                new_length: char_len(input, "new_string"),
            },
            &["file", "edit"],
        )),
        "Bash" => classify_command(input, action.tool_response.as_ref()),
        "WebFetch" => Some(Classified::new(
            EntityType::Url,
            owned_field(input, "url"),
            ResourceFetchedPayload {
                prompt: str_field(input, "prompt")
                    .map(|p| truncate_chars(p, FETCH_PROMPT_MAX_CHARS).to_owned()),
            },
            &["web", "fetch"],
        )),
        "WebSearch" => {
            let query = owned_field(input, "query");
            Some(Classified::new(
                EntityType::Search,
                query.clone(),
                WebSearchedPayload {
                    query: query.unwrap_or_default(),
                },
                &["web", "search"],
            ))
        }
        "Task" => {
            let kind = str_field(input, "subagent_type").unwrap_or_default();
            Some(Classified::new(
                EntityType::Task,
                owned_field(input, "subagent_type"),
                TaskSpawnedPayload {
                    description: owned_field(input, "description"),
                    prompt: str_field(input, "prompt")
                        .map(|p| truncate_chars(p, TASK_PROMPT_MAX_CHARS).to_owned()),
                },
                &["task", kind],
            ))
        }
        "TodoWrite" => {
            let todos = input.get("todos").and_then(Value::as_array);
            let with_status = |status: &str| {
                todos.map_or(0, |items| {
                    items
                        .iter()
                        .filter(|t| t.get("status").and_then(Value::as_str) == Some(status))
                        .count() as u64
                })
            };
            Some(Classified::new(
                EntityType::Todos,
                None,
                TodosUpdatedPayload {
                    count: todos.map_or(0, |items| items.len() as u64),
                    in_progress: with_status("in_progress"),
                    completed: with_status("completed"),
                },
                &["todos"],
            ))
        }
        // Read-only tools and anything unrecognised.
        _ => None,
    }
}

fn classify_command(input: &Value, response: Option<&Value>) -> Option<Classified> {
    let command = str_field(input, "command").unwrap_or_default();
    let first = command.split_whitespace().next();
    if first.is_some_and(|tok| NOISY_COMMANDS.contains(&tok)) {
        tracing::trace!(command, "noisy command suppressed");
        return None;
    }

    let is_git = first == Some("git");
    let is_test = command.contains("test");
    let is_build = command.contains("build") || command.contains("compile");
    let success = !response
        .and_then(|r| r.get("error"))
        .is_some_and(is_truthy);

    Some(Classified::new(
        EntityType::Command,
        first.map(str::to_owned),
        CommandExecutedPayload {
            command: truncate_chars(command, COMMAND_MAX_CHARS).to_owned(),
            success,
        },
        &[
            "command",
            if is_git { "git" } else { "" },
            if is_test { "test" } else { "" },
            if is_build { "build" } else { "" },
        ],
    ))
}

fn str_field<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
    input.get(key).and_then(Value::as_str)
}

fn owned_field(input: &Value, key: &str) -> Option<String> {
    str_field(input, key).map(str::to_owned)
}

fn char_len(input: &Value, key: &str) -> u64 {
    str_field(input, key).map_or(0, |s| s.chars().count() as u64)
}

/// Loose truthiness as the host reports errors: empty strings, zero,
/// `false` and `null` all mean "no error".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
