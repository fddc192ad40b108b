//! Working directory → project identity.
//!
//! The identity selects which event log a caller uses: the final path segment
//! of the enclosing git root, else the final segment of the directory itself,
//! else [`UNKNOWN_PROJECT`]. Resolution never fails.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Identity used when no directory is available.
pub const UNKNOWN_PROJECT: &str = "unknown";

/// Locates the version-control root enclosing a directory.
pub trait RootLocator {
    /// Root directory containing `dir`, or `None` when `dir` is not inside a repository.
    fn locate_root(&self, dir: &Path) -> Option<PathBuf>;
}

/// [`RootLocator`] backed by `git rev-parse --show-toplevel`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitRootLocator;

impl RootLocator for GitRootLocator {
    fn locate_root(&self, dir: &Path) -> Option<PathBuf> {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["rev-parse", "--show-toplevel"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(error = %e, "git not available for root lookup");
                return None;
            }
        };
        if !output.status.success() {
            return None;
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        (!root.is_empty()).then(|| PathBuf::from(root))
    }
}

/// Resolve the project identity for `dir` using git.
pub fn resolve_project(dir: Option<&Path>) -> String {
    resolve_project_with(&GitRootLocator, dir)
}

/// Resolve the project identity for `dir` with an explicit root locator.
pub fn resolve_project_with(locator: &dyn RootLocator, dir: Option<&Path>) -> String {
    let Some(dir) = dir else {
        return UNKNOWN_PROJECT.to_owned();
    };
    let root = locator.locate_root(dir);
    let identity = root
        .as_deref()
        .and_then(basename)
        .or_else(|| basename(dir))
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_owned());
    tracing::debug!(dir = %dir.display(), project = %identity, "resolved project");
    identity
}

fn basename(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
