//! Error types for the directory watcher.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Errors that can occur in the directory watcher.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Watch root does not exist.
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Watch root exists but is not a directory.
    #[error("{} is not a valid directory", .0.display())]
    NotADirectory(PathBuf),

    /// Snippet depth must be at least one level.
    #[error("snippet depth for {} must be a positive integer, got {depth}", path.display())]
    InvalidDepth { path: PathBuf, depth: usize },

    /// No watch targets configured.
    #[error("no directories configured to watch")]
    NoTargets,

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// IO error.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
