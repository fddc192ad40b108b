//! Everything one invocation needs from its environment.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use devlog_core::{GitRootLocator, RootLocator, resolve_project_with};
use devlog_events::{ConnectionConfig, StoreRegistry};
use devlog_settings::DevlogSettings;

/// Environment variable lookup.
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Settings, store registry and process environment for one invocation.
///
/// Built once in `main`; tests build it with fakes.
pub struct Runtime {
    /// Loaded settings.
    pub settings: DevlogSettings,
    /// Project stores under the configured events directory.
    pub registry: StoreRegistry,
    /// Home directory, shown as `~` in file paths.
    pub home: Option<String>,
    /// Working directory of the process.
    pub cwd: Option<PathBuf>,
    /// Version-control root lookup.
    pub locator: Box<dyn RootLocator>,
    /// Environment variable lookup.
    pub env: EnvLookup,
    /// Reference time for windows and ages.
    pub now: DateTime<Utc>,
}

impl Runtime {
    /// Runtime for the real process environment.
    pub fn from_process(settings: DevlogSettings) -> Self {
        let home = devlog_settings::home_dir();
        let registry = StoreRegistry::new(settings.events_dir(&home), connection_config(&settings));
        Self {
            settings,
            registry,
            home: Some(home.to_string_lossy().into_owned()),
            cwd: std::env::current_dir().ok(),
            locator: Box::new(GitRootLocator),
            env: Box::new(|name| std::env::var(name).ok()),
            now: Utc::now(),
        }
    }

    /// Project identity for `dir`.
    pub fn project_for(&self, dir: Option<&Path>) -> String {
        resolve_project_with(self.locator.as_ref(), dir)
    }

    /// Project identity for the process working directory.
    pub fn current_project(&self) -> String {
        self.project_for(self.cwd.as_deref())
    }

    /// `project` if given, else the current directory's project.
    pub fn project_or_current(&self, project: Option<&str>) -> String {
        project.map_or_else(|| self.current_project(), str::to_owned)
    }

    /// Look up an environment variable.
    pub fn var(&self, name: &str) -> Option<String> {
        (self.env)(name)
    }
}

/// Connection settings derived from loaded settings.
pub fn connection_config(settings: &DevlogSettings) -> ConnectionConfig {
    ConnectionConfig {
        busy_timeout_ms: settings.storage.busy_timeout_ms,
    }
}
