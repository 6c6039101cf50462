//! Source reads for the index build. `init` touches every source file once,
//! so large files are mapped rather than copied through a buffer.

use anyhow::{Context, Result};
use std::path::Path;

const MMAP_THRESHOLD: u64 = 64 * 1024;

/// Reads a file found by the walker; `size` comes from the metadata the
/// caller already checked against the index size limit.
pub async fn read_file(path: &Path, size: u64) -> Result<Vec<u8>> {
    if size > MMAP_THRESHOLD {
        return read_mapped(path).await;
    }

    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {} for indexing", path.display()))
}

async fn read_mapped(path: &Path) -> Result<Vec<u8>> {
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open {} for indexing", path.display()))?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(mmap.to_vec())
    })
    .await?
}
