//! Command dispatch.
//!
//! Every command resolves its project, acquires the store through the
//! registry for the duration of one closure and writes plain text to `out`.

use std::io::{Read, Write};

use anyhow::Context as _;
use devlog_events::handoff::record_handoff;
use devlog_events::types::HandoffPayload;
use devlog_events::views::{self, StatusOptions};
use devlog_events::work_queue::{self, CompleteOutcome, WorkFilter};
use devlog_events::{EventStoreError, SliceId};

use crate::cli::Command;
use crate::errors::CliError;
use crate::render;
use crate::runtime::Runtime;
use crate::{hook, session_start};

/// Run one command.
pub fn run(
    command: Command,
    rt: &Runtime,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Projects => projects(rt, out),
        Command::Status { project } => status(rt, &rt.project_or_current(project.as_deref()), out),
        Command::Slice { project, slice_id } => slice(
            rt,
            &rt.project_or_current(project.as_deref()),
            slice_id.map(SliceId::from),
            out,
        ),
        Command::Recent { days } => {
            let rows = views::activity(&rt.registry, days, rt.now).context("failed to read activity")?;
            out.write_all(render::activity(days, &rows).as_bytes())?;
            Ok(())
        }
        Command::Queue {
            description,
            context,
        } => {
            let project = rt.current_project();
            let event = rt
                .registry
                .with_store(&project, |s| work_queue::queue(s, &description, context.as_deref()))
                .with_context(|| format!("failed to queue work for {project}"))?;
            writeln!(out, "Work queued: {}\n   {description}", event.event_id.short())?;
            Ok(())
        }
        Command::Block {
            description,
            reason,
        } => {
            let project = rt.current_project();
            let event = rt
                .registry
                .with_store(&project, |s| work_queue::block(s, &description, &reason))
                .with_context(|| format!("failed to record blocked work for {project}"))?;
            writeln!(
                out,
                "Work blocked: {}\n   {description}\n   Reason: {reason}",
                event.event_id.short()
            )?;
            Ok(())
        }
        Command::Complete { prefix } => complete(rt, &prefix, out),
        Command::Work { all } => work(rt, all, out),
        Command::Handoff { json } => handoff(rt, &json, out),
        Command::Context => session_start::run(rt, input, out),
        Command::Hook => {
            hook::run(rt, input);
            Ok(())
        }
    }
}

fn projects(rt: &Runtime, out: &mut dyn Write) -> anyhow::Result<()> {
    let dir = rt.registry.base_dir();
    if !dir.is_dir() {
        writeln!(out, "No events directory: {}", dir.display())?;
        return Ok(());
    }
    let summaries = views::project_overview(&rt.registry).context("failed to list projects")?;
    out.write_all(render::projects(&summaries).as_bytes())?;
    Ok(())
}

fn status(rt: &Runtime, project: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let opts = StatusOptions::from_settings(&rt.settings);
    let st = rt
        .registry
        .with_existing(project, |s| views::status(s, &opts))
        .with_context(|| format!("failed to read status of {project}"))?;
    match st {
        Some(st) => out.write_all(render::status(project, &st).as_bytes())?,
        None => eprintln!("No events for project: {project}"),
    }
    Ok(())
}

fn slice(
    rt: &Runtime,
    project: &str,
    slice_id: Option<SliceId>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let timeline = rt
        .registry
        .with_existing(project, |s| views::slice_timeline(s, slice_id.as_ref()))
        .with_context(|| format!("failed to read slices of {project}"))?;
    // An unknown slice ID renders as an empty timeline.
    match timeline {
        None => eprintln!("No events for project: {project}"),
        Some(None) => writeln!(out, "No slices found")?,
        Some(Some(t)) => out.write_all(render::timeline(&t).as_bytes())?,
    }
    Ok(())
}

fn complete(rt: &Runtime, prefix: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let project = rt.current_project();
    let outcome = match rt
        .registry
        .with_store(&project, |s| work_queue::complete(s, prefix))
    {
        Ok(outcome) => outcome,
        Err(EventStoreError::WorkItemNotFound(p)) => {
            return Err(CliError::NotFound(format!("No work item found matching: {p}")).into());
        }
        Err(e) => return Err(e).with_context(|| format!("failed to complete work in {project}")),
    };
    let verb = match outcome {
        CompleteOutcome::Completed { .. } => "Work completed",
        CompleteOutcome::AlreadyCompleted { .. } => "Work already completed",
    };
    let item = outcome.item();
    writeln!(out, "{verb}: {}\n   {}", item.id.short(), item.description)?;
    Ok(())
}

fn work(rt: &Runtime, all: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let project = rt.current_project();
    let (filter, limit) = if all {
        (WorkFilter::All, rt.settings.work.all_limit)
    } else {
        (WorkFilter::Open, rt.settings.work.open_limit)
    };
    let items = rt
        .registry
        .with_existing(&project, |s| work_queue::list(s, filter, limit))
        .with_context(|| format!("failed to list work for {project}"))?;
    match items {
        Some(items) => out.write_all(render::work_list(&project, filter, &items).as_bytes())?,
        None => writeln!(out, "No events for project: {project}")?,
    }
    Ok(())
}

fn handoff(rt: &Runtime, raw: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| CliError::Usage(format!("handoff is not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(CliError::Usage("handoff must be a JSON object".into()).into());
    }
    let payload: HandoffPayload =
        serde_json::from_value(value).map_err(|e| CliError::Usage(format!("invalid handoff: {e}")))?;

    let project = rt.current_project();
    let event = rt
        .registry
        .with_store(&project, |s| record_handoff(s, payload))
        .with_context(|| format!("failed to store handoff for {project}"))?;
    writeln!(out, "Handoff stored: {}", event.event_id.short())?;
    Ok(())
}
