//! Session-start context path.
//!
//! Prints the resumable context of the session's project wrapped in a
//! `<system-reminder>` block so the host injects it into the new session.

use std::io::{Read, Write};
use std::path::PathBuf;

use devlog_events::context::{ContextOptions, ResumeContext, build_context};
use serde::Deserialize;

use crate::runtime::Runtime;

/// Printed instead of the context when the user asked for a fresh start.
pub const FRESH_NOTICE: &str = "Fresh session requested - skipping context restoration";

#[derive(Debug, Deserialize)]
struct SessionStart {
    #[serde(default)]
    cwd: Option<PathBuf>,
}

fn truthy(value: Option<String>) -> bool {
    matches!(value.as_deref(), Some("1" | "true"))
}

fn is_subagent(rt: &Runtime) -> bool {
    rt.var("CLAUDE_CODE_AGENT").is_some() || rt.var("SUBAGENT").as_deref() == Some("true")
}

/// Wrap rendered context for injection.
pub fn wrap(project: &str, body: &str) -> String {
    format!(
        "<system-reminder>\nEVENT STORE CONTEXT (Auto-loaded from {project}.db)\n\n{body}\n\n\
         To start fresh without this context, set CLAUDE_FRESH=1\n</system-reminder>"
    )
}

/// Print the context block for the session described on `input`.
///
/// Empty or malformed input prints nothing. A payload without `cwd` resolves
/// to the `unknown` project. Storage errors are logged, never returned.
pub fn run(rt: &Runtime, input: &mut dyn Read, out: &mut dyn Write) -> anyhow::Result<()> {
    if is_subagent(rt) {
        return Ok(());
    }
    if truthy(rt.var("CLAUDE_FRESH")) {
        writeln!(out, "{FRESH_NOTICE}")?;
        return Ok(());
    }

    let mut raw = String::new();
    if let Err(e) = input.read_to_string(&mut raw) {
        tracing::debug!(error = %e, "unreadable session-start input");
        return Ok(());
    }
    if raw.trim().is_empty() {
        return Ok(());
    }
    let start: SessionStart = match serde_json::from_str(&raw) {
        Ok(start) => start,
        Err(e) => {
            tracing::debug!(error = %e, "malformed session-start payload ignored");
            return Ok(());
        }
    };

    let project = rt.project_for(start.cwd.as_deref());
    let opts = ContextOptions::from_settings(&rt.settings);
    let ctx: Option<ResumeContext> = match rt
        .registry
        .with_existing(&project, |store| build_context(store, &project, rt.now, &opts))
    {
        Ok(ctx) => ctx.flatten(),
        Err(e) => {
            tracing::error!(project = %project, error = %e, "failed to build session context");
            None
        }
    };

    if let Some(ctx) = ctx {
        let body = ctx.render(rt.now, rt.home.as_deref());
        writeln!(out, "{}", wrap(&project, &body))?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_format() {
        let text = wrap("alpha", "RESUMING PROJECT: alpha");
        assert!(text.starts_with("<system-reminder>\nEVENT STORE CONTEXT (Auto-loaded from alpha.db)\n\n"));
        assert!(text.contains("RESUMING PROJECT: alpha\n\nTo start fresh"));
        assert!(text.ends_with("CLAUDE_FRESH=1\n</system-reminder>"));
    }

    #[test]
    fn fresh_values() {
        assert!(truthy(Some("1".into())));
        assert!(truthy(Some("true".into())));
        assert!(!truthy(Some("yes".into())));
        assert!(!truthy(None));
    }
}
