//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`DevlogSettings::default()`]
//! 2. If `~/.devlog/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::DevlogSettings;

/// Environment variable naming the events directory.
pub const ENV_EVENTS_DIR: &str = "DEVLOG_EVENTS_DIR";
/// Legacy installation root; events live under `$PAI_DIR/events`.
pub const ENV_PAI_DIR: &str = "PAI_DIR";
/// Environment variable overriding the log filter.
pub const ENV_LOG_LEVEL: &str = "DEVLOG_LOG_LEVEL";
/// Environment variable overriding the `SQLite` busy timeout.
pub const ENV_BUSY_TIMEOUT_MS: &str = "DEVLOG_BUSY_TIMEOUT_MS";

/// The user's home directory (`$HOME`, falling back to `/tmp`).
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_owned()))
}

/// Resolve the path to the settings file (`~/.devlog/settings.json`).
pub fn settings_path() -> PathBuf {
    home_dir().join(".devlog").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<DevlogSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with process env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<DevlogSettings> {
    load_settings_with_env(path, &|name| std::env::var(name).ok())
}

/// Load settings from `path`, reading overrides through `env`.
pub fn load_settings_with_env(
    path: &Path,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<DevlogSettings> {
    let defaults = serde_json::to_value(DevlogSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: DevlogSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings, env);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// `DEVLOG_EVENTS_DIR` replaces any configured directory. `PAI_DIR` only
/// fills the directory in when nothing else set it. Invalid values are
/// ignored with a warning.
pub fn apply_env_overrides(settings: &mut DevlogSettings, env: &dyn Fn(&str) -> Option<String>) {
    let read = |name: &str| env(name).filter(|v| !v.is_empty());

    // ── Storage ─────────────────────────────────────────────────────
    if let Some(v) = read(ENV_EVENTS_DIR) {
        settings.storage.events_dir = Some(v);
    } else if settings.storage.events_dir.is_none()
        && let Some(pai) = read(ENV_PAI_DIR)
    {
        settings.storage.events_dir = Some(format!("{}/events", pai.trim_end_matches('/')));
    }
    if let Some(v) = read(ENV_BUSY_TIMEOUT_MS) {
        match parse_u64_range(&v, 100, 600_000) {
            Some(ms) => settings.storage.busy_timeout_ms = ms,
            None => tracing::warn!(key = ENV_BUSY_TIMEOUT_MS, value = %v, "invalid u64 env var, ignoring"),
        }
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SettingsError;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"context": {"fileLimit": 5, "commandLimit": 3}});
        let source = serde_json::json!({"context": {"fileLimit": 9}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["context"]["fileLimit"], 9);
        assert_eq!(merged["context"]["commandLimit"], 3);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        assert_eq!(deep_merge(target, source)["a"], 42);
    }

    // ── load_settings_with_env ──────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_settings_with_env(Path::new("/nonexistent/settings.json"), &no_env).unwrap();
        assert_eq!(settings.storage.busy_timeout_ms, 5000);
        assert!(settings.storage.events_dir.is_none());
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"storage": {"eventsDir": "/data/events"}, "work": {"allLimit": 50}}"#,
        )
        .unwrap();

        let settings = load_settings_with_env(&path, &no_env).unwrap();
        assert_eq!(settings.storage.events_dir.as_deref(), Some("/data/events"));
        assert_eq!(settings.work.all_limit, 50);
        assert_eq!(settings.work.open_limit, 100);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();
        assert_matches!(load_settings_with_env(&path, &no_env), Err(SettingsError::Json(_)));
    }

    #[test]
    fn load_zero_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"status": {"sliceLimit": 0}}"#).unwrap();
        assert_matches!(
            load_settings_with_env(&path, &no_env),
            Err(SettingsError::InvalidValue(_))
        );
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn env_events_dir_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"storage": {"eventsDir": "/from/file"}}"#).unwrap();
        let env = env_of(&[(ENV_EVENTS_DIR, "/from/env"), (ENV_PAI_DIR, "/pai")]);
        let settings = load_settings_with_env(&path, &env).unwrap();
        assert_eq!(settings.storage.events_dir.as_deref(), Some("/from/env"));
    }

    #[test]
    fn pai_dir_only_fills_gap() {
        let mut settings = DevlogSettings::default();
        apply_env_overrides(&mut settings, &env_of(&[(ENV_PAI_DIR, "/opt/pai/")]));
        assert_eq!(settings.storage.events_dir.as_deref(), Some("/opt/pai/events"));

        let mut configured = DevlogSettings::default();
        configured.storage.events_dir = Some("/mine".into());
        apply_env_overrides(&mut configured, &env_of(&[(ENV_PAI_DIR, "/opt/pai")]));
        assert_eq!(configured.storage.events_dir.as_deref(), Some("/mine"));
    }

    #[test]
    fn busy_timeout_range_checked() {
        let mut settings = DevlogSettings::default();
        apply_env_overrides(&mut settings, &env_of(&[(ENV_BUSY_TIMEOUT_MS, "250")]));
        assert_eq!(settings.storage.busy_timeout_ms, 250);

        apply_env_overrides(&mut settings, &env_of(&[(ENV_BUSY_TIMEOUT_MS, "5")]));
        assert_eq!(settings.storage.busy_timeout_ms, 250);

        apply_env_overrides(&mut settings, &env_of(&[(ENV_BUSY_TIMEOUT_MS, "soon")]));
        assert_eq!(settings.storage.busy_timeout_ms, 250);
    }

    #[test]
    fn log_level_override_and_empty_ignored() {
        let mut settings = DevlogSettings::default();
        apply_env_overrides(&mut settings, &env_of(&[(ENV_LOG_LEVEL, "")]));
        assert_eq!(settings.logging.level, "warn");
        apply_env_overrides(&mut settings, &env_of(&[(ENV_LOG_LEVEL, "debug")]));
        assert_eq!(settings.logging.level, "debug");
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_u64_bounds() {
        assert_eq!(parse_u64_range("100", 100, 200), Some(100));
        assert_eq!(parse_u64_range("201", 100, 200), None);
        assert_eq!(parse_u64_range("-1", 0, 10), None);
    }
}
