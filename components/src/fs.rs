//! Async file helpers that attach the path and action to every error.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{ComponentError, Result};

pub(crate) async fn exists(path: &Path) -> Result<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| ComponentError::io("access", path, e))
}

pub(crate) async fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| ComponentError::io("read", path, e))
}

/// Read a file, treating a missing one as empty.
pub(crate) async fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ComponentError::io("read", path, e)),
    }
}

pub(crate) async fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .await
        .map_err(|e| ComponentError::io("write", path, e))
}

pub(crate) async fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| ComponentError::io("append to", path, e))?;
    file.write_all(content.as_bytes())
        .await
        .map_err(|e| ComponentError::io("append to", path, e))?;
    file.flush()
        .await
        .map_err(|e| ComponentError::io("append to", path, e))
}

pub(crate) async fn remove(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .await
        .map_err(|e| ComponentError::io("remove", path, e))
}

/// Create an empty file unless one already exists. Returns whether it was created.
pub(crate) async fn create_new(path: &Path) -> Result<bool> {
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ComponentError::io("create", path, e)),
    }
}
