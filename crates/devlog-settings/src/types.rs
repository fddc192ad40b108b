//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! `settings.json` only needs the keys it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "storage": { "eventsDir": "~/work/events" },
///   "context": { "fileLimit": 8 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevlogSettings {
    /// Settings schema version.
    pub version: String,
    /// Where the per-project logs live and how they are opened.
    pub storage: StorageSettings,
    /// Diagnostic logging.
    pub logging: LoggingSettings,
    /// Windows and bounds for the session-start context.
    pub context: ContextSettings,
    /// Bounds for `devlog status`.
    pub status: StatusSettings,
    /// Bounds for work item listings.
    pub work: WorkSettings,
}

impl Default for DevlogSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_owned(),
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
            context: ContextSettings::default(),
            status: StatusSettings::default(),
            work: WorkSettings::default(),
        }
    }
}

impl DevlogSettings {
    /// Directory holding `<project>.db` files.
    ///
    /// A configured directory wins (a leading `~/` expands to `home`);
    /// otherwise `<home>/.claude/events`.
    pub fn events_dir(&self, home: &Path) -> PathBuf {
        match self.storage.events_dir.as_deref() {
            Some(dir) if !dir.is_empty() => expand_home(dir, home),
            _ => home.join(".claude").join("events"),
        }
    }

    /// Reject values that would make every derivation empty.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("context.fileWindowDays", self.context.file_window_days),
            ("context.fileLimit", self.context.file_limit),
            ("context.commandWindowDays", self.context.command_window_days),
            ("context.commandLimit", self.context.command_limit),
            ("context.statsWindowDays", self.context.stats_window_days),
            ("status.sliceLimit", self.status.slice_limit),
            ("status.fileLimit", self.status.file_limit),
            ("status.commandLimit", self.status.command_limit),
            ("work.openLimit", self.work.open_limit),
            ("work.allLimit", self.work.all_limit),
        ];
        if let Some((key, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(SettingsError::InvalidValue(format!("{key} must be positive")));
        }
        if self.storage.busy_timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "storage.busyTimeoutMs must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn expand_home(dir: &str, home: &Path) -> PathBuf {
    if dir == "~" {
        home.to_path_buf()
    } else if let Some(rest) = dir.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(dir)
    }
}

/// Storage location and `SQLite` connection behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Events directory; `None` means `~/.claude/events`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_dir: Option<String>,
    /// How long a writer waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            events_dir: None,
            busy_timeout_ms: 5000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: devlog_core::logging::DEFAULT_LEVEL.to_owned(),
        }
    }
}

/// Session-start context windows (days) and row bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextSettings {
    /// Trailing window for recently touched files.
    pub file_window_days: u32,
    /// Maximum files listed.
    pub file_limit: u32,
    /// Trailing window for recent commands.
    pub command_window_days: u32,
    /// Maximum commands listed.
    pub command_limit: u32,
    /// Trailing window for the session/slice/event counts.
    pub stats_window_days: u32,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            file_window_days: 7,
            file_limit: 5,
            command_window_days: 1,
            command_limit: 3,
            stats_window_days: 7,
        }
    }
}

/// Bounds for the project status view.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusSettings {
    /// Recent slices shown.
    pub slice_limit: u32,
    /// Recent files shown.
    pub file_limit: u32,
    /// Recent commands shown.
    pub command_limit: u32,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            slice_limit: 5,
            file_limit: 10,
            command_limit: 5,
        }
    }
}

/// Bounds for work item listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkSettings {
    /// Open items listed by `devlog work` and the session-start context.
    pub open_limit: u32,
    /// Items listed by `devlog work --all`.
    pub all_limit: u32,
}

impl Default for WorkSettings {
    fn default() -> Self {
        Self {
            open_limit: 100,
            all_limit: 20,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
