//! Resumable context: a summary of where a project left off.
//!
//! [`build_context`] gathers the pieces from the log; [`ResumeContext::render`]
//! turns them into the plain-text block injected at session start. Both take
//! `now` explicitly so output is deterministic under test.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use devlog_core::text::{shorten_home, truncate_chars};
use devlog_core::time::{cutoff, format_age, parse_timestamp};
use devlog_settings::DevlogSettings;

use crate::errors::{EventStoreError, Result};
use crate::slice::latest_slice;
use crate::sqlite::repositories::event::EventQuery;
use crate::sqlite::row_types::WindowStats;
use crate::store::ProjectStore;
use crate::types::{EventData, EventType, HandoffPayload};
use crate::work_queue::{self, WorkFilter, WorkItem, WorkStatus};

/// Characters of a command shown in the rendered context.
const COMMAND_DISPLAY_CHARS: usize = 50;

/// Windows and bounds for [`build_context`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    /// Trailing window for recent files, in days.
    pub file_window_days: u32,
    /// Maximum recent files.
    pub file_limit: u32,
    /// Trailing window for recent commands, in days.
    pub command_window_days: u32,
    /// Maximum recent commands.
    pub command_limit: u32,
    /// Trailing window for activity counts, in days.
    pub stats_window_days: u32,
    /// Maximum open work items.
    pub open_limit: u32,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            file_window_days: 7,
            file_limit: 5,
            command_window_days: 1,
            command_limit: 3,
            stats_window_days: 7,
            open_limit: 100,
        }
    }
}

impl ContextOptions {
    /// Bounds taken from loaded settings.
    pub fn from_settings(settings: &DevlogSettings) -> Self {
        let c = &settings.context;
        Self {
            file_window_days: c.file_window_days,
            file_limit: c.file_limit,
            command_window_days: c.command_window_days,
            command_limit: c.command_limit,
            stats_window_days: c.stats_window_days,
            open_limit: settings.work.open_limit,
        }
    }
}

/// The newest interaction in the project.
#[derive(Clone, Debug, PartialEq)]
pub struct LastSlice {
    /// When it started.
    pub at: DateTime<Utc>,
    /// Prompt preview (may be empty).
    pub prompt_preview: String,
}

/// The newest handoff in the project.
#[derive(Clone, Debug, PartialEq)]
pub struct HandoffSummary {
    /// When it was written.
    pub at: DateTime<Utc>,
    /// Sections as given.
    pub payload: HandoffPayload,
}

/// A file touched in the window.
#[derive(Clone, Debug, PartialEq)]
pub struct RecentFile {
    /// File path as recorded.
    pub path: String,
    /// Create/modify events in the window.
    pub edits: i64,
    /// Latest touch.
    pub last: DateTime<Utc>,
}

/// A command run in the window.
#[derive(Clone, Debug, PartialEq)]
pub struct RecentCommand {
    /// Stored command text.
    pub command: String,
    /// Whether it succeeded.
    pub success: bool,
    /// When it ran.
    pub at: DateTime<Utc>,
}

/// Everything needed to resume a project.
#[derive(Clone, Debug, PartialEq)]
pub struct ResumeContext {
    /// Project identity.
    pub project: String,
    /// Newest slice.
    pub last_slice: LastSlice,
    /// Newest handoff, if any.
    pub handoff: Option<HandoffSummary>,
    /// Recent files, newest first.
    pub files: Vec<RecentFile>,
    /// Recent commands, newest first.
    pub commands: Vec<RecentCommand>,
    /// Open work items, newest first.
    pub open_work: Vec<WorkItem>,
    /// Activity counts over the stats window.
    pub stats: WindowStats,
    /// Length of the stats window, in days.
    pub stats_window_days: u32,
}

/// Gather the resumable context, or `None` if no interaction was ever recorded.
pub fn build_context(
    store: &ProjectStore,
    project: &str,
    now: DateTime<Utc>,
    opts: &ContextOptions,
) -> Result<Option<ResumeContext>> {
    let Some(slice) = latest_slice(store)? else {
        return Ok(None);
    };
    let prompt_preview = match slice.data {
        EventData::SliceStarted(p) => p.prompt_preview,
        _ => String::new(),
    };

    let handoff = store
        .first(
            &EventQuery::new()
                .types(&[EventType::SessionHandoff])
                .newest_first(),
        )?
        .and_then(|e| match e.data {
            EventData::SessionHandoff(payload) => Some(HandoffSummary {
                at: e.timestamp,
                payload,
            }),
            _ => None,
        });

    let files = store
        .file_activity(Some(&cutoff(now, opts.file_window_days)), opts.file_limit)?
        .into_iter()
        .map(|row| {
            let last = parse_timestamp(&row.last)
                .ok_or_else(|| EventStoreError::InvalidTimestamp(row.last.clone()))?;
            Ok(RecentFile {
                path: row.path,
                edits: row.edits,
                last,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let commands = store
        .query(
            &EventQuery::new()
                .types(&[EventType::CommandExecuted])
                .since(cutoff(now, opts.command_window_days))
                .newest_first()
                .limit(opts.command_limit),
        )?
        .into_iter()
        .filter_map(|e| match e.data {
            EventData::CommandExecuted(p) => Some(RecentCommand {
                command: p.command,
                success: p.success,
                at: e.timestamp,
            }),
            _ => None,
        })
        .collect();

    let open_work = work_queue::list(store, WorkFilter::Open, opts.open_limit)?;
    let stats = store.window_stats(&cutoff(now, opts.stats_window_days))?;

    Ok(Some(ResumeContext {
        project: project.to_owned(),
        last_slice: LastSlice {
            at: slice.timestamp,
            prompt_preview,
        },
        handoff,
        files,
        commands,
        open_work,
        stats,
        stats_window_days: opts.stats_window_days,
    }))
}

impl ResumeContext {
    /// Plain-text rendering. `home` is replaced by `~` in file paths.
    pub fn render(&self, now: DateTime<Utc>, home: Option<&str>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "RESUMING PROJECT: {}", self.project);
        out.push('\n');
        let _ = write!(out, "Last activity: {}", format_age(self.last_slice.at, now));
        if !self.last_slice.prompt_preview.is_empty() {
            let _ = write!(out, "\nLast prompt: \"{}...\"", self.last_slice.prompt_preview);
        }

        if let Some(handoff) = &self.handoff {
            let _ = write!(out, "\n\nHandoff ({}):", format_age(handoff.at, now));
            if let Some(goal) = &handoff.payload.goal {
                let _ = write!(out, "\n  Goal: {}", goal.joined());
            }
            for (label, field) in handoff.payload.sections() {
                let items = field.items();
                if items.is_empty() {
                    continue;
                }
                let _ = write!(out, "\n  {label}:");
                for item in items {
                    let _ = write!(out, "\n    - {item}");
                }
            }
        }

        if !self.files.is_empty() {
            out.push_str("\n\nRecent files:");
            for f in &self.files {
                let _ = write!(out, "\n  - {} ({} edits)", shorten_home(&f.path, home), f.edits);
            }
        }

        if !self.commands.is_empty() {
            out.push_str("\n\nRecent commands:");
            for c in &self.commands {
                let mark = if c.success { '✓' } else { '✗' };
                let _ = write!(out, "\n  {mark} {}", truncate_chars(&c.command, COMMAND_DISPLAY_CHARS));
            }
        }

        if !self.open_work.is_empty() {
            out.push_str("\n\nOpen work items:");
            for w in &self.open_work {
                let marker = match w.status {
                    WorkStatus::Blocked => "[blocked]",
                    WorkStatus::Pending => "[pending]",
                };
                let _ = write!(out, "\n  {marker} {}", w.description);
                if let Some(ctx) = &w.context {
                    let _ = write!(out, "\n      Context: {ctx}");
                }
            }
        }

        let _ = write!(
            out,
            "\n\nStats ({}d): {} sessions, {} prompts, {} events",
            self.stats_window_days, self.stats.sessions, self.stats.slices, self.stats.events
        );
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::classify::{ActionRecord, classify};
    use crate::slice::start_slice;
    use crate::types::payloads::HandoffField;
    use crate::types::{EntityType, NewEvent};
    use chrono::Duration;
    use devlog_core::SessionId;
    use serde_json::json;

    fn act(store: &ProjectStore, session: &SessionId, tool: &str, input: serde_json::Value) {
        let slice = crate::slice::current_slice(store, session).unwrap().unwrap();
        let action = ActionRecord {
            tool_name: tool.into(),
            tool_input: input,
            tool_response: None,
        };
        store
            .append(&classify(&action).unwrap().into_event(session.clone(), slice))
            .unwrap();
    }

    #[test]
    fn empty_project_has_no_context() {
        let store = ProjectStore::open_in_memory().unwrap();
        work_queue::queue(&store, "orphan", None).unwrap();
        let ctx = build_context(&store, "p", Utc::now(), &ContextOptions::default()).unwrap();
        assert!(ctx.is_none());
    }

    #[test]
    fn gathers_every_section() {
        let store = ProjectStore::open_in_memory().unwrap();
        let s = SessionId::from("s1");
        start_slice(&store, &s, "add caching layer").unwrap();
        act(&store, &s, "Write", json!({"file_path": "/home/dev/p/a.rs", "content": "x"}));
        act(&store, &s, "Edit", json!({"file_path": "/home/dev/p/a.rs", "old_string": "x", "new_string": "y"}));
        act(&store, &s, "Bash", json!({"command": "cargo test"}));
        work_queue::queue(&store, "benchmark cache", Some("use criterion")).unwrap();
        work_queue::block(&store, "ship", "needs review").unwrap();
        let done = work_queue::queue(&store, "done already", None).unwrap();
        work_queue::complete(&store, done.event_id.as_str()).unwrap();

        let handoff = HandoffPayload {
            goal: Some(HandoffField::Single(json!("faster reads"))),
            done: Some(HandoffField::List(vec![json!("lru"), json!("metrics")])),
            ..HandoffPayload::default()
        };
        store
            .append(&NewEvent::new(
                s.clone(),
                None,
                EntityType::Handoff,
                None,
                handoff,
                &["handoff"],
            ))
            .unwrap();

        let now = Utc::now() + Duration::seconds(5);
        let ctx = build_context(&store, "p", now, &ContextOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(ctx.last_slice.prompt_preview, "add caching layer");
        assert!(ctx.handoff.is_some());
        assert_eq!(ctx.files.len(), 1);
        assert_eq!(ctx.files[0].edits, 2);
        assert_eq!(ctx.commands.len(), 1);
        assert_eq!(ctx.open_work.len(), 2);
        assert_eq!(ctx.open_work[0].description, "ship");
        assert_eq!(ctx.stats.sessions, 2);
        assert_eq!(ctx.stats.slices, 1);

        let text = ctx.render(now, Some("/home/dev"));
        assert!(text.starts_with("RESUMING PROJECT: p\n\nLast activity: just now"));
        assert!(text.contains("Last prompt: \"add caching layer...\""));
        assert!(text.contains("  Goal: faster reads"));
        assert!(text.contains("  Done:\n    - lru\n    - metrics"));
        assert!(text.contains("  - ~/p/a.rs (2 edits)"));
        assert!(text.contains("  ✓ cargo test"));
        assert!(text.contains("  [blocked] ship"));
        assert!(text.contains("  [pending] benchmark cache\n      Context: use criterion"));
        assert!(!text.contains("done already"));
        assert!(text.ends_with("Stats (7d): 2 sessions, 1 prompts, 9 events"));
    }

    #[test]
    fn windows_exclude_old_activity() {
        let store = ProjectStore::open_in_memory().unwrap();
        let s = SessionId::from("s1");
        start_slice(&store, &s, "").unwrap();
        act(&store, &s, "Bash", json!({"command": "make"}));
        act(&store, &s, "Write", json!({"file_path": "/a", "content": ""}));

        // Two days on, the one-day command window is empty; files still show.
        let later = Utc::now() + Duration::days(2);
        let ctx = build_context(&store, "p", later, &ContextOptions::default())
            .unwrap()
            .unwrap();
        assert!(ctx.commands.is_empty());
        assert_eq!(ctx.files.len(), 1);

        let text = ctx.render(later, None);
        assert!(text.contains("Last activity: 2d ago"));
        assert!(!text.contains("Last prompt"));
        assert!(!text.contains("Recent commands"));
        assert!(!text.contains("Handoff"));
    }

    #[test]
    fn options_follow_settings() {
        let mut settings = DevlogSettings::default();
        settings.context.file_limit = 9;
        settings.work.open_limit = 7;
        let opts = ContextOptions::from_settings(&settings);
        assert_eq!(opts.file_limit, 9);
        assert_eq!(opts.open_limit, 7);
        assert_eq!(opts.command_window_days, 1);
    }

    #[test]
    fn commands_shortened_in_rendering() {
        let store = ProjectStore::open_in_memory().unwrap();
        let s = SessionId::from("s1");
        start_slice(&store, &s, "p").unwrap();
        act(&store, &s, "Bash", json!({"command": format!("make {}", "y".repeat(100))}));
        let now = Utc::now();
        let text = build_context(&store, "p", now, &ContextOptions::default())
            .unwrap()
            .unwrap()
            .render(now, None);
        let line = text.lines().find(|l| l.starts_with("  ✓ make")).unwrap();
        assert_eq!(line.chars().count(), "  ✓ ".chars().count() + COMMAND_DISPLAY_CHARS);
    }
}
