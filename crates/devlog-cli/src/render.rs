//! Plain-text output for the human command surface.

use std::fmt::Write as _;

use devlog_core::text::truncate_chars;
use devlog_core::time::format_timestamp;
use devlog_events::views::{ProjectActivity, ProjectStatus, ProjectSummary, SliceTimeline, timeline_detail};
use devlog_events::work_queue::{WorkFilter, WorkItem, WorkStatus};

/// Characters of a command shown in `status`.
const STATUS_COMMAND_CHARS: usize = 60;

fn mark(success: bool) -> char {
    if success { '✓' } else { '✗' }
}

/// `projects` output.
pub fn projects(summaries: &[ProjectSummary]) -> String {
    let mut out = String::from("Projects with events:\n");
    for p in summaries {
        let last = p.last.as_deref().unwrap_or("never");
        let _ = writeln!(out, "  {}: {} events (last: {last})", p.project, p.events);
    }
    out
}

/// `status` output.
pub fn status(project: &str, st: &ProjectStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {project} ===\n");

    out.push_str("Recent slices:\n");
    for s in &st.slices {
        let prompt = if s.prompt_preview.is_empty() {
            "(no prompt)"
        } else {
            s.prompt_preview.as_str()
        };
        let _ = writeln!(out, "  [{}] {prompt}", format_timestamp(s.at));
    }

    out.push_str("\nRecent files:\n");
    for f in &st.files {
        let _ = writeln!(out, "  {} ({} edits, last: {})", f.path, f.edits, f.last);
    }

    out.push_str("\nRecent commands:\n");
    for c in &st.commands {
        let _ = writeln!(
            out,
            "  {} {}",
            mark(c.success),
            truncate_chars(&c.command, STATUS_COMMAND_CHARS)
        );
    }

    out.push_str("\nEvent summary:\n");
    for (event_type, count) in &st.histogram {
        let _ = writeln!(out, "  {event_type}: {count}");
    }
    out
}

/// `slice` output.
pub fn timeline(t: &SliceTimeline) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Slice: {}\n", t.slice_id);
    for e in &t.events {
        let _ = writeln!(
            out,
            "  [{}] {}: {}",
            format_timestamp(e.timestamp),
            e.event_type(),
            timeline_detail(e)
        );
    }
    out
}

/// `recent` output.
pub fn activity(days: u32, rows: &[ProjectActivity]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Activity in last {days} days:\n");
    for r in rows {
        let _ = writeln!(
            out,
            "  {}: {} events, {} slices, {} sessions",
            r.project, r.stats.events, r.stats.slices, r.stats.sessions
        );
    }
    out
}

/// `work` output.
pub fn work_list(project: &str, filter: WorkFilter, items: &[WorkItem]) -> String {
    let heading = match filter {
        WorkFilter::Open => "Open",
        WorkFilter::All => "All",
    };
    let mut out = String::new();
    let _ = writeln!(out, "{heading} work items for: {project}\n");
    if items.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for item in items {
        let marker = match (item.completed, item.status) {
            (true, _) => "done",
            (false, WorkStatus::Blocked) => "blocked",
            (false, WorkStatus::Pending) => "pending",
        };
        let _ = writeln!(out, "  [{marker}] [{}] {}", item.id.short(), item.description);
        if let Some(reason) = &item.reason {
            let _ = writeln!(out, "      Blocked: {reason}");
        }
        if let Some(ctx) = &item.context {
            let _ = writeln!(out, "      Context: {ctx}");
        }
        let _ = writeln!(out, "      Created: {}", format_timestamp(item.created));
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
