//! Component events from directory watching.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use serde::{Deserialize, Serialize};

use crate::config::WatchTarget;

/// Extensions of files treated as UI components.
pub const COMPONENT_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// Check whether a path names a component source file.
pub fn is_component_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| COMPONENT_EXTENSIONS.contains(&ext))
}

/// Kind of component event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentEventKind {
    /// File appeared, either on the initial scan or later.
    Created,

    /// File was removed or renamed away.
    Deleted,
}

/// A component file appearing or disappearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEvent {
    /// The kind of event.
    pub kind: ComponentEventKind,

    /// Absolute path to the component file. A deletion may also name a
    /// directory that was removed or moved away with components inside.
    pub path: PathBuf,
}

impl ComponentEvent {
    /// Create a new component event.
    pub fn new(kind: ComponentEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(ComponentEventKind::Created, path)
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::new(ComponentEventKind::Deleted, path)
    }

    /// Translate a raw notify event into add/unlink style events.
    ///
    /// Renames are split into a deletion of the old path and a creation of
    /// the new one. Directory creations, modifications and access events are
    /// dropped, as are paths that are not component files.
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let events = match event.kind {
            notify::EventKind::Create(CreateKind::Folder) => Vec::new(),
            notify::EventKind::Create(_) => event
                .paths
                .iter()
                .filter(|path| !path.is_dir())
                .map(Self::created)
                .collect(),
            notify::EventKind::Remove(_) => event.paths.iter().map(Self::deleted).collect(),
            notify::EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From => event.paths.iter().map(Self::deleted).collect(),
                RenameMode::To => event.paths.iter().map(Self::created).collect(),
                RenameMode::Both => {
                    let mut split = Vec::with_capacity(2);
                    if let Some(from) = event.paths.first() {
                        split.push(Self::deleted(from));
                    }
                    if let Some(to) = event.paths.get(1) {
                        split.push(Self::created(to));
                    }
                    split
                }
                // Backends that cannot tell the direction report the path
                // as it is now.
                _ => event
                    .paths
                    .iter()
                    .map(|path| {
                        if path.exists() {
                            Self::created(path)
                        } else {
                            Self::deleted(path)
                        }
                    })
                    .collect(),
            },
            _ => Vec::new(),
        };

        events
            .into_iter()
            .filter(|event| is_component_path(&event.path) && !event.path.is_dir())
            .collect()
    }
}

/// Directory-level changes carried by a notify event.
///
/// Moving a directory is reported once for the directory itself, never for
/// the files inside it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectoryChanges {
    /// Directories that now exist and need their contents walked.
    pub appeared: Vec<PathBuf>,

    /// Paths that are gone and may have been directories.
    pub vanished: Vec<PathBuf>,
}

impl DirectoryChanges {
    pub fn from_notify(event: &notify::Event) -> Self {
        let mut changes = Self::default();
        match event.kind {
            notify::EventKind::Create(_) => changes.appear(&event.paths),
            notify::EventKind::Remove(RemoveKind::File) => {}
            notify::EventKind::Remove(_) => changes.vanish(&event.paths),
            notify::EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From => changes.vanish(&event.paths),
                RenameMode::To => changes.appear(&event.paths),
                RenameMode::Both => {
                    changes.vanish(event.paths.get(..1).unwrap_or_default());
                    changes.appear(event.paths.get(1..).unwrap_or_default());
                }
                _ => {
                    let (present, gone): (Vec<PathBuf>, Vec<PathBuf>) =
                        event.paths.iter().cloned().partition(|path| path.exists());
                    changes.appear(&present);
                    changes.vanish(&gone);
                }
            },
            _ => {}
        }
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.appeared.is_empty() && self.vanished.is_empty()
    }

    fn appear(&mut self, paths: &[PathBuf]) {
        self.appeared
            .extend(paths.iter().filter(|path| path.is_dir()).cloned());
    }

    fn vanish(&mut self, paths: &[PathBuf]) {
        self.vanished
            .extend(paths.iter().filter(|path| !is_component_path(path)).cloned());
    }
}

/// An event tagged with the target whose watcher observed it.
#[derive(Debug, Clone)]
pub struct TargetEvent {
    /// The owning target.
    pub target: Arc<WatchTarget>,

    /// The observed event.
    pub event: ComponentEvent,
}
