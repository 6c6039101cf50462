use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tokio::fs;

use crate::error::SessedError;
use crate::session::Session;

pub fn ensure_absent(path: &Path) -> Result<(), SessedError> {
    if path.exists() {
        return Err(SessedError::FileAlreadyExists {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Writes `body` to a new file at `path`. The session ends up with no file
/// open; the new file has to be opened explicitly.
pub async fn create<W: Write>(
    session: &mut Session,
    path: &Path,
    body: &str,
    out: &mut W,
) -> Result<()> {
    ensure_absent(path)?;
    session.close();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    writeln!(out, "created file: {}", path.display())?;
    Ok(())
}
