//! Barrel (index) file maintenance.
//!
//! Each directory holding components gets one index file with a line per
//! component:
//!
//! ```text
//! export { default as button } from './Button';
//! ```
//!
//! Lines are appended on creation, deduplicated, removed on deletion, and the
//! file is deleted once no export remains.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::fs;
use crate::naming::{file_stem, to_camel_case};
use crate::project::ProjectProfile;
use crate::registry::KnownFiles;

/// Outcome of an index operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdate {
    /// The component is the index file itself, or there is no index file.
    Skipped,
    /// Nothing needed to change.
    Unchanged,
    /// An export line was appended.
    Added,
    /// An export line was removed and other exports remain.
    Removed,
    /// The last export was removed and the index file deleted.
    Deleted,
}

/// Keeps the per-directory index files in sync with components.
#[derive(Debug, Clone)]
pub struct IndexSynchronizer {
    file_name: String,
}

impl IndexSynchronizer {
    /// Create a synchronizer that writes index files with this name.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Index file for the directory containing `component`.
    pub fn index_path(&self, component: &Path) -> PathBuf {
        component.with_file_name(&self.file_name)
    }

    /// Export line for a component, without the trailing newline.
    pub fn export_line(component: &Path) -> String {
        let stem = file_stem(component);
        format!(
            "export {{ default as {} }} from './{stem}';",
            to_camel_case(&stem)
        )
    }

    /// Add the component's export to its directory's index file.
    pub async fn add_entry(&self, component: &Path, registry: &mut KnownFiles) -> Result<IndexUpdate> {
        let index_path = self.index_path(component);
        if component == index_path {
            return Ok(IndexUpdate::Skipped);
        }

        let line = Self::export_line(component);
        let existing = fs::read_or_empty(&index_path).await?;

        let mut update = IndexUpdate::Unchanged;
        if !existing.lines().any(|present| present == line) {
            let mut addition = String::with_capacity(line.len() + 2);
            if !existing.is_empty() && !existing.ends_with('\n') {
                addition.push('\n');
            }
            addition.push_str(&line);
            addition.push('\n');

            fs::append(&index_path, &addition).await?;
            registry.insert(&index_path);
            info!(
                "{} added to index file: {}",
                to_camel_case(&file_stem(component)),
                index_path.display()
            );
            update = IndexUpdate::Added;
        }

        Self::remove_duplicates(&index_path).await?;
        Ok(update)
    }

    /// Remove the component's export from its directory's index file.
    ///
    /// The component is forgotten by the registry whatever the outcome.
    pub async fn remove_entry(
        &self,
        component: &Path,
        registry: &mut KnownFiles,
    ) -> Result<IndexUpdate> {
        let index_path = self.index_path(component);
        if component == index_path {
            return Ok(IndexUpdate::Skipped);
        }
        if !fs::exists(&index_path).await? {
            registry.remove(component);
            return Ok(IndexUpdate::Skipped);
        }

        let name = to_camel_case(&file_stem(component));
        if name.is_empty() {
            registry.remove(component);
            return Ok(IndexUpdate::Unchanged);
        }

        // The name has to be the exported binding: the alias after `as`, or a
        // bare specifier. `default` in `default as button` is not a match.
        let export = Regex::new(&format!(
            r#"(?i)export\s*\{{(?:[^}}]*?\bas\s+|[^}}]*?,\s*|\s*){}\s*(?:,[^}}]*)?\}}\s*from\s*['"]\./[^'"]+['"];?\s*\n?"#,
            regex_lite::escape(&name)
        ))?;

        let content = fs::read(&index_path).await?;
        let stripped = export.replace_all(&content, "");
        let updated = stripped.trim();

        let update = if updated == content.trim() {
            debug!("{name} not found in {}", index_path.display());
            IndexUpdate::Unchanged
        } else if updated.is_empty() {
            fs::remove(&index_path).await?;
            registry.remove(&index_path);
            info!("Deleted empty index file: {}", index_path.display());
            IndexUpdate::Deleted
        } else {
            fs::write(&index_path, &format!("{updated}\n")).await?;
            info!("Removed {name} from {}", index_path.display());
            IndexUpdate::Removed
        };

        registry.remove(component);
        Ok(update)
    }

    /// Rewrite the file keeping only the first occurrence of each line.
    ///
    /// Returns the number of lines dropped.
    async fn remove_duplicates(index_path: &Path) -> Result<usize> {
        let content = fs::read(index_path).await?;
        let (body, trailing_newline) = match content.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (content.as_str(), false),
        };

        let lines: Vec<&str> = body.split('\n').collect();
        let unique: IndexSet<&str> = lines.iter().copied().collect();
        let removed = lines.len() - unique.len();

        if removed > 0 {
            let mut cleaned = unique.into_iter().collect::<Vec<_>>().join("\n");
            if trailing_newline {
                cleaned.push('\n');
            }
            fs::write(index_path, &cleaned).await?;
            info!(
                "Found and removed {removed} duplicate(s) from {}",
                index_path.display()
            );
        }

        Ok(removed)
    }
}

/// Pick the index file name.
///
/// Without a request the name is `index` plus the project's default
/// extension. A request without an extension gets the default extension; a
/// request with anything other than `.ts` or `.js` falls back to the default.
pub fn resolve_index_file_name(requested: Option<&str>, profile: ProjectProfile) -> String {
    let default_extension = profile.default_index_extension();
    let default_name = format!("index{default_extension}");

    let Some(requested) = requested.filter(|name| !name.is_empty()) else {
        return default_name;
    };

    match Path::new(requested).extension().and_then(OsStr::to_str) {
        None => format!("{requested}{default_extension}"),
        Some("ts" | "js") => requested.to_string(),
        Some(_) => {
            warn!("Invalid index file extension in {requested}. Using {default_name}.");
            default_name
        }
    }
}
