//! Read-only project views for the command surface.

use chrono::{DateTime, Utc};
use devlog_core::SliceId;
use devlog_core::text::truncate_chars;
use devlog_core::time::cutoff;
use devlog_settings::DevlogSettings;

use crate::context::RecentCommand;
use crate::errors::Result;
use crate::slice::latest_slice;
use crate::sqlite::repositories::event::EventQuery;
use crate::sqlite::row_types::{FileActivityRow, WindowStats};
use crate::store::{ProjectStore, StoreRegistry};
use crate::types::{Event, EventData, EventType};

/// Characters of a command shown as a timeline detail.
const TIMELINE_COMMAND_CHARS: usize = 40;

/// One known project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSummary {
    /// Project identity.
    pub project: String,
    /// Total events.
    pub events: i64,
    /// Latest stored timestamp, if any.
    pub last: Option<String>,
}

/// Every known project with its size and latest activity.
pub fn project_overview(registry: &StoreRegistry) -> Result<Vec<ProjectSummary>> {
    let mut out = Vec::new();
    for project in registry.list_projects()? {
        let summary = registry.with_existing(&project, |store| {
            Ok((store.count()?, store.latest_timestamp()?))
        })?;
        if let Some((events, last)) = summary {
            out.push(ProjectSummary {
                project,
                events,
                last,
            });
        }
    }
    Ok(out)
}

/// Bounds for [`status`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusOptions {
    /// Maximum recent slices.
    pub slice_limit: u32,
    /// Maximum recent files.
    pub file_limit: u32,
    /// Maximum recent commands.
    pub command_limit: u32,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            slice_limit: 5,
            file_limit: 10,
            command_limit: 5,
        }
    }
}

impl StatusOptions {
    /// Bounds taken from loaded settings.
    pub fn from_settings(settings: &DevlogSettings) -> Self {
        Self {
            slice_limit: settings.status.slice_limit,
            file_limit: settings.status.file_limit,
            command_limit: settings.status.command_limit,
        }
    }
}

/// A slice as listed in [`ProjectStatus`].
#[derive(Clone, Debug, PartialEq)]
pub struct SliceSummary {
    /// Slice ID.
    pub slice_id: Option<SliceId>,
    /// When it started.
    pub at: DateTime<Utc>,
    /// Prompt preview (may be empty).
    pub prompt_preview: String,
}

/// Project status: recent slices, files, commands and an event histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectStatus {
    /// Newest slices first.
    pub slices: Vec<SliceSummary>,
    /// Files grouped by path, newest first, over all time.
    pub files: Vec<FileActivityRow>,
    /// Newest commands first.
    pub commands: Vec<RecentCommand>,
    /// Event count per type, largest first.
    pub histogram: Vec<(String, i64)>,
}

/// Status of one project.
pub fn status(store: &ProjectStore, opts: &StatusOptions) -> Result<ProjectStatus> {
    let slices = store
        .query(
            &EventQuery::new()
                .types(&[EventType::SliceStarted])
                .newest_first()
                .limit(opts.slice_limit),
        )?
        .into_iter()
        .map(|e| SliceSummary {
            prompt_preview: match e.data {
                EventData::SliceStarted(p) => p.prompt_preview,
                _ => String::new(),
            },
            slice_id: e.slice_id,
            at: e.timestamp,
        })
        .collect();

    let commands = store
        .query(
            &EventQuery::new()
                .types(&[EventType::CommandExecuted])
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

    Ok(ProjectStatus {
        slices,
        files: store.file_activity(None, opts.file_limit)?,
        commands,
        histogram: store.type_histogram()?,
    })
}

/// Every event of one slice, oldest first.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceTimeline {
    /// The slice shown.
    pub slice_id: SliceId,
    /// Its events.
    pub events: Vec<Event>,
}

/// Timeline of `slice`, or of the project's newest slice when `None`.
///
/// Returns `None` when no slice is given and the project has none.
pub fn slice_timeline(store: &ProjectStore, slice: Option<&SliceId>) -> Result<Option<SliceTimeline>> {
    let slice_id = match slice {
        Some(id) => id.clone(),
        None => match latest_slice(store)?.and_then(|e| e.slice_id) {
            Some(id) => id,
            None => return Ok(None),
        },
    };
    let events = store.query(&EventQuery::new().slice(slice_id.as_str()))?;
    Ok(Some(SliceTimeline { slice_id, events }))
}

/// One-line detail for a timeline entry.
pub fn timeline_detail(event: &Event) -> String {
    if let Some(id) = event.entity_id.as_deref().filter(|id| !id.is_empty()) {
        return id.to_owned();
    }
    match &event.data {
        EventData::SliceStarted(p) => p.prompt_preview.clone(),
        EventData::CommandExecuted(p) => truncate_chars(&p.command, TIMELINE_COMMAND_CHARS).to_owned(),
        _ => String::new(),
    }
}

/// Activity counts of one project over a window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectActivity {
    /// Project identity.
    pub project: String,
    /// Counts in the window.
    pub stats: WindowStats,
}

/// Projects with at least one event in the trailing `days` days.
pub fn activity(registry: &StoreRegistry, days: u32, now: DateTime<Utc>) -> Result<Vec<ProjectActivity>> {
    let since = cutoff(now, days);
    let mut out = Vec::new();
    for project in registry.list_projects()? {
        let stats = registry.with_existing(&project, |store| store.window_stats(&since))?;
        if let Some(stats) = stats.filter(|s| s.events > 0) {
            out.push(ProjectActivity { project, stats });
        }
    }
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
