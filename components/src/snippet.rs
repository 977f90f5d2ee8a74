//! Writing generated content into component files.

use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::fs;

/// Result of a snippet write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetOutcome {
    Written,
    /// The file already had content and was left alone.
    SkippedNonEmpty,
}

/// Whether a file has no content other than whitespace.
pub async fn is_file_empty(path: &Path) -> Result<bool> {
    let content = fs::read(path).await?;
    Ok(content.trim().is_empty())
}

/// Write `content` to `path` unless the file already has content.
pub async fn write_snippet(path: &Path, content: &str) -> Result<SnippetOutcome> {
    if !is_file_empty(path).await? {
        warn!("File {} is not empty", path.display());
        return Ok(SnippetOutcome::SkippedNonEmpty);
    }

    fs::write(path, content).await?;
    info!("Snippet written to {}", path.display());
    Ok(SnippetOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_whitespace_counts_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let blank = temp_dir.path().join("Blank.tsx");
        std::fs::write(&blank, " \n\t\n").unwrap();
        let filled = temp_dir.path().join("Filled.tsx");
        std::fs::write(&filled, "export default 1;").unwrap();

        assert!(is_file_empty(&blank).await.unwrap());
        assert!(!is_file_empty(&filled).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_only_into_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("Button.tsx");
        std::fs::write(&empty, "").unwrap();
        let existing = temp_dir.path().join("Card.tsx");
        std::fs::write(&existing, "// mine").unwrap();

        assert_eq!(
            write_snippet(&empty, "const button = 1;").await.unwrap(),
            SnippetOutcome::Written
        );
        assert_eq!(
            write_snippet(&existing, "const card = 1;").await.unwrap(),
            SnippetOutcome::SkippedNonEmpty
        );

        assert_eq!(std::fs::read_to_string(&empty).unwrap(), "const button = 1;");
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "// mine");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = is_file_empty(&temp_dir.path().join("Gone.tsx"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
