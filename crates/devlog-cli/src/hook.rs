//! Hook dispatch path.
//!
//! Reads one payload from stdin and records it in the project resolved from
//! the payload's `cwd`. Nothing here reaches the exit code: unreadable or
//! unrecognized input is ignored, storage failures are logged.

use std::io::Read;

use devlog_events::ingest::{self, DispatchOutcome, HookMessage};

use crate::runtime::Runtime;

/// Record one hook payload read from `input`.
pub fn run(rt: &Runtime, input: &mut dyn Read) {
    let mut raw = String::new();
    if let Err(e) = input.read_to_string(&mut raw) {
        tracing::debug!(error = %e, "unreadable hook input");
        return;
    }
    let message = HookMessage::decode(&raw);
    if matches!(message, HookMessage::Unrecognized) {
        tracing::debug!("unrecognized hook payload ignored");
        return;
    }

    let project = rt.project_for(message.cwd());
    match rt.registry.with_store(&project, |store| ingest::record(store, &message)) {
        Ok(DispatchOutcome::Appended(id)) => {
            tracing::debug!(project = %project, event_id = %id, "hook event recorded");
        }
        Ok(outcome) => tracing::debug!(project = %project, ?outcome, "hook payload not recorded"),
        Err(e) => tracing::error!(project = %project, error = %e, "failed to record hook event"),
    }
}
