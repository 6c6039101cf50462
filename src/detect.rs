use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::SessedError;

/// Root of the tree to index: the given path, or the enclosing git
/// repository of the current directory, or the current directory itself.
pub async fn find_source_root(path: Option<PathBuf>) -> Result<PathBuf> {
    let explicit = path.is_some();
    let start = match path {
        Some(p) => {
            if p.is_absolute() {
                p
            } else {
                std::env::current_dir()?.join(p)
            }
        }
        None => std::env::current_dir()?,
    };

    let start = fs::canonicalize(&start)
        .await
        .with_context(|| format!("Failed to canonicalize path: {}", start.display()))?;

    if explicit {
        return Ok(start);
    }

    if let Some(git_root) = find_git_root(&start).await {
        return Ok(git_root);
    }

    Ok(start)
}

async fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let git_dir = current.join(".git");
        if fs::metadata(&git_dir).await.is_ok() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// The directory holding the session and index artifacts. It must be
/// configured; it is created on first use.
pub async fn prepare_state_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = dir.ok_or(SessedError::StateDirUnset)?;

    fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create state directory {}", dir.display()))?;

    let dir = fs::canonicalize(&dir)
        .await
        .with_context(|| format!("Failed to canonicalize path: {}", dir.display()))?;

    log::debug!("state directory: {}", dir.display());
    Ok(dir)
}
