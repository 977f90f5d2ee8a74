//! Error types for component maintenance.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for component operations.
pub type Result<T> = std::result::Result<T, ComponentError>;

/// Errors that can occur while maintaining components.
#[derive(Error, Debug)]
pub enum ComponentError {
    /// A filesystem operation failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template could not be loaded.
    #[error("template error: {0}")]
    Template(String),

    /// Unknown style kind.
    #[error("invalid style type: {given} (valid style types: {valid})")]
    InvalidStyle { given: String, valid: String },

    /// Project manifest could not be parsed.
    #[error("invalid project manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A generated pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

impl ComponentError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether the error is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
