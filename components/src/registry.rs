//! Registry of files the tool created or adopted.
//!
//! Deletion handling consults this registry before touching anything, so a
//! user removing a hand-written component never mutates a barrel or style
//! file. The registry has a single owner, the engine, which lends it to the
//! handler for the duration of one event.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of absolute paths managed by the tool.
#[derive(Debug, Default, Clone)]
pub struct KnownFiles {
    paths: HashSet<PathBuf>,
}

impl KnownFiles {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a managed file. Returns `true` if it was not known before.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Forget a file. Returns `true` if it was known.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.paths.remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All known paths, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Known paths strictly inside `dir`, sorted.
    pub fn below(&self, dir: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .paths
            .iter()
            .filter(|path| path.starts_with(dir) && path.as_path() != dir)
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}
