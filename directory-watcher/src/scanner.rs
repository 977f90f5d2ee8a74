//! Initial scan of a watch root.
//!
//! Reports every component file already present under a target, honoring the
//! same depth limit and exclusions as the live watcher.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{WatchTarget, is_excluded};
use crate::event::is_component_path;

/// Walks a target for existing component files.
pub struct InitialScan<'a> {
    target: &'a WatchTarget,
    excludes: &'a [PathBuf],
}

impl<'a> InitialScan<'a> {
    /// Create a scan for a target, skipping the excluded roots.
    pub fn new(target: &'a WatchTarget, excludes: &'a [PathBuf]) -> Self {
        Self { target, excludes }
    }

    /// Collect component files in a stable, per-directory sorted order.
    pub fn components(&self) -> Vec<PathBuf> {
        let found = self.walk(&self.target.path, self.target.snippet_depth);
        debug!(
            "Initial scan of {} found {} component(s)",
            self.target.path.display(),
            found.len()
        );
        found
    }

    /// Collect component files under a directory that appeared inside the
    /// target, stopping at the target's snippet depth.
    pub fn components_under(&self, dir: &Path) -> Vec<PathBuf> {
        if is_excluded(dir, self.excludes) {
            return Vec::new();
        }
        match self.target.level_of(dir) {
            Some(level) if level < self.target.snippet_depth => {
                self.walk(dir, self.target.snippet_depth - level)
            }
            _ => Vec::new(),
        }
    }

    fn walk(&self, dir: &Path, max_depth: usize) -> Vec<PathBuf> {
        let excludes = self.excludes;
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry.path(), excludes));

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry during scan: {e}");
                    continue;
                }
            };

            if entry.file_type().is_file() && is_component_path(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found
    }

    /// Root being scanned.
    pub fn root(&self) -> &Path {
        &self.target.path
    }
}
