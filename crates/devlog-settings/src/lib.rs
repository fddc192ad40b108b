//! # devlog-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`DevlogSettings::default()`]
//! 2. **User file**: `~/.devlog/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `DEVLOG_*` and `PAI_DIR` overrides (highest priority)
//!
//! Each invocation is a short-lived process, so settings are loaded once in
//! `main` and passed down by reference rather than held in a global.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, home_dir, load_settings, load_settings_from_path,
    load_settings_with_env, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
