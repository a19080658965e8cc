//! Project root and data directory resolution.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::prelude::*;
use crate::security::PathValidator;

/// Files or directories whose presence marks a project root.
pub const DEFAULT_MARKERS: &[&str] = &["pyproject.toml", "requirements.txt", ".git", "Cargo.toml"];

/// Environment variable holding an explicit project root.
pub const ROOT_ENV_VAR: &str = "PREP_GUARD_ROOT";

const DEFAULT_DATA_DIR: &str = "data";

/// Where a project keeps its datasets.
///
/// The root is an explicit value; [`ProjectLayout::discover`] is available
/// for callers that want to locate it from a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    data_dir: String,
}

impl ProjectLayout {
    /// Uses `root` as the project root with the data directory `root/data`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
        }
    }

    /// Changes the name of the data directory below the root.
    pub fn with_data_dir(mut self, data_dir: impl Into<String>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Reads the root from `PREP_GUARD_ROOT`, if set and non-empty.
    pub fn from_env() -> Option<Self> {
        std::env::var_os(ROOT_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(|root| Self::new(PathBuf::from(root)))
    }

    /// Walks up from `start` until a directory contains one of
    /// [`DEFAULT_MARKERS`] or a `data` directory. Falls back to `start`.
    pub fn discover(start: impl AsRef<Path>) -> Self {
        Self::discover_with_markers(start, DEFAULT_MARKERS)
    }

    /// Like [`ProjectLayout::discover`] with custom marker names.
    pub fn discover_with_markers(start: impl AsRef<Path>, markers: &[&str]) -> Self {
        let start = start.as_ref();
        let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

        let root = start
            .ancestors()
            .find(|dir| {
                markers.iter().any(|m| dir.join(m).exists()) || dir.join(DEFAULT_DATA_DIR).is_dir()
            })
            .unwrap_or(start.as_path())
            .to_path_buf();

        debug!(start = %start.display(), root = %root.display(), "Resolved project root");
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<data dir>`
    pub fn data_root(&self) -> PathBuf {
        self.root.join(&self.data_dir)
    }

    /// Joins a relative path under the data root. Absolute paths and parent
    /// directory components are rejected.
    pub fn resolve_data_path(&self, relative: &Path) -> Result<PathBuf> {
        PathValidator::validate_relative(relative)?;
        let relative: PathBuf = relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        Ok(self.data_root().join(relative))
    }
}
