//! [`StoreRegistry`]: one store per project identity under a base directory.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::sqlite::connection::ConnectionConfig;

use super::event_store::ProjectStore;

const DB_EXTENSION: &str = "db";

/// Opens project stores on demand. Holds no connections itself.
#[derive(Clone, Debug)]
pub struct StoreRegistry {
    base_dir: PathBuf,
    config: ConnectionConfig,
}

impl StoreRegistry {
    /// Registry rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, config: ConnectionConfig) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
        }
    }

    /// Directory holding every `<project>.db`.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Backing file for `project`.
    pub fn path_for(&self, project: &str) -> PathBuf {
        self.base_dir.join(format!("{project}.{DB_EXTENSION}"))
    }

    /// Open the store for `project`, creating directory, file and schema.
    pub fn open(&self, project: &str) -> Result<ProjectStore> {
        std::fs::create_dir_all(&self.base_dir)?;
        ProjectStore::open(&self.path_for(project), &self.config)
    }

    /// Open the store for `project` only if its file exists.
    pub fn open_existing(&self, project: &str) -> Result<Option<ProjectStore>> {
        ProjectStore::open_existing(&self.path_for(project), &self.config)
    }

    /// Open, run `f`, close. The store is released on every path.
    pub fn with_store<T>(
        &self,
        project: &str,
        f: impl FnOnce(&ProjectStore) -> Result<T>,
    ) -> Result<T> {
        let store = self.open(project)?;
        let value = f(&store)?;
        store.close()?;
        Ok(value)
    }

    /// Like [`with_store`](Self::with_store) but `None` when the project has no log.
    pub fn with_existing<T>(
        &self,
        project: &str,
        f: impl FnOnce(&ProjectStore) -> Result<T>,
    ) -> Result<Option<T>> {
        let Some(store) = self.open_existing(project)? else {
            return Ok(None);
        };
        let value = f(&store)?;
        store.close()?;
        Ok(Some(value))
    }

    /// Known project identities, sorted. Empty when the directory is missing.
    pub fn list_projects(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut projects = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(DB_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                projects.push(stem.to_owned());
            }
        }
        projects.sort();
        Ok(projects)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::errors::EventStoreError;
    use assert_matches::assert_matches;

    fn registry(dir: &Path) -> StoreRegistry {
        StoreRegistry::new(dir.join("events"), ConnectionConfig::default())
    }

    #[test]
    fn path_is_project_dot_db() {
        let reg = StoreRegistry::new("/tmp/ev", ConnectionConfig::default());
        assert_eq!(reg.path_for("alpha"), PathBuf::from("/tmp/ev/alpha.db"));
    }

    #[test]
    fn open_creates_directory_lazily() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = registry(tmp.path());
        assert!(!reg.base_dir().exists());
        assert!(reg.list_projects().unwrap().is_empty());

        reg.with_store("alpha", |store| store.count()).unwrap();
        assert!(reg.path_for("alpha").is_file());
    }

    #[test]
    fn with_existing_skips_unknown_projects() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = registry(tmp.path());
        let out = reg.with_existing("ghost", |store| store.count()).unwrap();
        assert!(out.is_none());
        assert!(!reg.path_for("ghost").exists());
    }

    #[test]
    fn list_projects_sorted_db_stems_only() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = registry(tmp.path());
        reg.open("zeta").unwrap().close().unwrap();
        reg.open("alpha").unwrap().close().unwrap();
        std::fs::write(reg.base_dir().join("notes.txt"), "x").unwrap();
        assert_eq!(reg.list_projects().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn with_store_propagates_closure_error() {
        let tmp = tempfile::tempdir().unwrap();
        let reg = registry(tmp.path());
        let err = reg
            .with_store("alpha", |_| -> Result<()> {
                Err(EventStoreError::WorkItemNotFound("x".into()))
            })
            .unwrap_err();
        assert_matches!(err, EventStoreError::WorkItemNotFound(_));
        // The store was released; reopening works.
        assert_eq!(reg.with_store("alpha", |s| s.count()).unwrap(), 0);
    }
}
