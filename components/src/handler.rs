//! Per-event component lifecycle.

use std::path::Path;

use autosnip_directory_watcher::{ComponentEvent, ComponentEventKind, WatchTarget, is_component_path};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::index::{IndexSynchronizer, IndexUpdate};
use crate::naming::component_name;
use crate::project::ProjectProfile;
use crate::registry::KnownFiles;
use crate::snippet::{SnippetOutcome, is_file_empty, write_snippet};
use crate::style::{StyleKind, StyleManager};
use crate::template::{TemplateSource, compile};

/// Options that apply to every handled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// File name of the per-directory index file.
    pub index_file_name: String,

    /// Create a paired style file of this kind for new components.
    pub style: Option<StyleKind>,

    /// Delete tool-created style files together with their component.
    pub remove_style: bool,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            index_file_name: "index.js".to_string(),
            style: None,
            remove_style: false,
        }
    }
}

impl HandlerSettings {
    pub fn with_index_file_name(mut self, name: impl Into<String>) -> Self {
        self.index_file_name = name.into();
        self
    }

    pub fn with_style(mut self, style: Option<StyleKind>) -> Self {
        self.style = style;
        self
    }

    pub fn with_remove_style(mut self, remove_style: bool) -> Self {
        self.remove_style = remove_style;
        self
    }
}

/// Fills new components, keeps index files current and manages style files.
#[derive(Debug, Clone)]
pub struct ComponentHandler {
    settings: HandlerSettings,
    templates: TemplateSource,
    project: ProjectProfile,
    index: IndexSynchronizer,
    styles: Option<StyleManager>,
}

impl ComponentHandler {
    pub fn new(settings: HandlerSettings, templates: TemplateSource, project: ProjectProfile) -> Self {
        let index = IndexSynchronizer::new(settings.index_file_name.clone());
        let styles = settings
            .style
            .map(|kind| StyleManager::new(kind, project.kind));

        Self {
            settings,
            templates,
            project,
            index,
            styles,
        }
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Handle one event for the target that reported it.
    pub async fn handle(
        &self,
        event: &ComponentEvent,
        target: &WatchTarget,
        registry: &mut KnownFiles,
    ) -> Result<()> {
        let component = is_component_path(&event.path);
        match event.kind {
            ComponentEventKind::Created if !component => {
                debug!("Ignoring non-component path {}", event.path.display());
                Ok(())
            }
            ComponentEventKind::Created => match self.on_created(&event.path, target, registry).await {
                // Created and removed again before we got to it.
                Err(e) if e.is_not_found() => {
                    debug!("{} disappeared before it was handled", event.path.display());
                    Ok(())
                }
                other => other,
            },
            ComponentEventKind::Deleted if component => self.on_deleted(&event.path, registry).await,
            ComponentEventKind::Deleted => self.on_removed_directory(&event.path, registry).await,
        }
    }

    async fn on_created(
        &self,
        path: &Path,
        target: &WatchTarget,
        registry: &mut KnownFiles,
    ) -> Result<()> {
        let template = self.templates.content_for(path)?;
        let name = component_name(path, self.project.kind);
        let mut content = compile(template, &name)?;

        // Only a fresh file gets a style file and import.
        let empty = is_file_empty(path).await?;
        if let Some(styles) = self.styles.filter(|_| empty) {
            content = styles.attach(path, &content, registry).await?;
        }

        if write_snippet(path, &content).await? == SnippetOutcome::Written {
            registry.insert(path);
        }

        let indexed = path.parent().is_some_and(|dir| target.indexes(dir));
        if !indexed {
            debug!(
                "{} is below index depth {} of {}",
                path.display(),
                target.index_depth,
                target.path.display()
            );
            return Ok(());
        }

        // A component whose export we maintain is ours to clean up later.
        if self.index.add_entry(path, registry).await? != IndexUpdate::Skipped {
            registry.insert(path);
        }
        Ok(())
    }

    async fn on_deleted(&self, path: &Path, registry: &mut KnownFiles) -> Result<()> {
        if !registry.contains(path) {
            debug!("{} is not managed, ignoring deletion", path.display());
            return Ok(());
        }

        self.index.remove_entry(path, registry).await?;
        registry.remove(path);

        if let Some(styles) = self.styles.filter(|_| self.settings.remove_style) {
            let style = styles.style_path(path);
            if registry.contains(&style) {
                styles.remove_paired(&style, registry).await?;
            }
        }
        Ok(())
    }

    /// Handle a directory that was removed or moved away as a deletion of
    /// every managed component it held.
    async fn on_removed_directory(&self, dir: &Path, registry: &mut KnownFiles) -> Result<()> {
        let below = registry.below(dir);
        if below.is_empty() {
            debug!("Nothing managed under {}", dir.display());
            return Ok(());
        }

        debug!("{} went away with {} managed file(s)", dir.display(), below.len());
        for path in below.iter().filter(|path| is_component_path(path)) {
            self.on_deleted(path, registry).await?;
        }
        // Index and style files that left along with the directory.
        for path in &below {
            registry.remove(path);
        }
        Ok(())
    }
}
