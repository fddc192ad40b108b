//! Timestamp format used in the event log.
//!
//! Timestamps are stored as fixed-width UTC text (`2026-01-02T03:04:05.678Z`)
//! so that lexical order in `SQLite` equals chronological order. Logs written
//! by older tooling use `SQLite`'s `datetime('now')` shape
//! (`2026-01-02 03:04:05`); [`parse_timestamp`] accepts both.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// `strftime` pattern matching the `SQLite` expression used on insert.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// The `SQLite` expression producing a timestamp in [`TIMESTAMP_FORMAT`].
pub const SQL_NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Render a timestamp in the stored format.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Stored-format cutoff for "the trailing `days` days" relative to `now`.
pub fn cutoff(now: DateTime<Utc>, days: u32) -> String {
    format_timestamp(now - Duration::days(i64::from(days)))
}

/// Parse a stored timestamp.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Coarse relative age: `3d ago`, `5h ago`, `12m ago` or `just now`.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if minutes > 0 {
        format!("{minutes}m ago")
    } else {
        "just now".to_owned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
