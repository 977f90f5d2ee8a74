//! Watch target configuration, ordering and exclusion.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatcherError};

/// Depth applied when a directory has no explicit snippet or index depth.
pub const DEFAULT_DEPTH: usize = 99;

/// A configured root directory plus its depth limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchTarget {
    /// Absolute path to the watched directory.
    pub path: PathBuf,

    /// How many directory levels below `path` are watched at all.
    /// `1` means only the root's immediate children.
    pub snippet_depth: usize,

    /// How many directory levels below `path` receive barrel files.
    /// `0` disables index maintenance for this target.
    pub index_depth: usize,
}

impl WatchTarget {
    /// Create a target with default depths.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snippet_depth: DEFAULT_DEPTH,
            index_depth: DEFAULT_DEPTH,
        }
    }

    /// Set the snippet depth.
    pub fn with_snippet_depth(mut self, depth: usize) -> Self {
        self.snippet_depth = depth;
        self
    }

    /// Set the index depth.
    pub fn with_index_depth(mut self, depth: usize) -> Self {
        self.index_depth = depth;
        self
    }

    /// Number of directory levels between the root and `dir`.
    ///
    /// The root itself is level 0. Returns `None` when `dir` is not inside
    /// the root.
    pub fn level_of(&self, dir: &Path) -> Option<usize> {
        dir.strip_prefix(&self.path)
            .ok()
            .map(|relative| relative.components().count())
    }

    /// Whether a file at `path` lies within the watched depth.
    pub fn watches(&self, path: &Path) -> bool {
        match path.strip_prefix(&self.path) {
            Ok(relative) => (1..=self.snippet_depth).contains(&relative.components().count()),
            Err(_) => false,
        }
    }

    /// Whether barrel files are maintained in `dir`.
    pub fn indexes(&self, dir: &Path) -> bool {
        self.level_of(dir)
            .is_some_and(|level| level < self.index_depth)
    }

    /// Check the target before any watcher is started.
    pub fn validate(&self) -> Result<()> {
        if self.snippet_depth == 0 {
            return Err(WatcherError::InvalidDepth {
                path: self.path.clone(),
                depth: self.snippet_depth,
            });
        }

        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WatcherError::DirectoryNotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(WatcherError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if !metadata.is_dir() {
            return Err(WatcherError::NotADirectory(self.path.clone()));
        }

        Ok(())
    }

    /// Validate the target and resolve its path the way watch backends
    /// report it, following symlinks and `..` components.
    pub fn canonicalize(self) -> Result<Self> {
        self.validate()?;
        let path = std::fs::canonicalize(&self.path).map_err(|source| WatcherError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(Self { path, ..self })
    }
}

/// How long the watchers stay open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchMode {
    /// Report existing files, then stop.
    #[default]
    Once,

    /// Report existing files, then keep watching until shut down.
    Continuous,
}

/// Order targets so that ancestors come before their descendants.
///
/// Sorts by path depth, then by path. The sort is stable, so a directory
/// configured twice keeps its configured order.
pub fn order_targets(mut targets: Vec<WatchTarget>) -> Vec<WatchTarget> {
    targets.sort_by(|a, b| {
        a.path
            .components()
            .count()
            .cmp(&b.path.components().count())
            .then_with(|| a.path.cmp(&b.path))
    });
    targets
}

/// Roots that the watcher for `targets[index]` must leave alone.
///
/// Every later target owns its own subtree, so events under it belong to
/// that target's watcher.
pub fn exclusions_for(targets: &[WatchTarget], index: usize) -> Vec<PathBuf> {
    targets
        .iter()
        .skip(index + 1)
        .map(|target| target.path.clone())
        .collect()
}

/// Whether `path` is inside any of the excluded roots.
pub fn is_excluded(path: &Path, excludes: &[PathBuf]) -> bool {
    excludes.iter().any(|exclude| path.starts_with(exclude))
}
