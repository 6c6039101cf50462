pub mod parse;
mod read;
mod walk;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

use crate::extract::language::Language;
use crate::extract::symbols::FileDefinitions;
use crate::index::SourceIndex;

const MAX_FILE_SIZE: u64 = 1024 * 1024;

const SEMAPHORE_PERMITS: usize = 256;

fn should_skip_file(size: u64) -> bool {
    size > MAX_FILE_SIZE
}

fn is_binary_content(data: &[u8]) -> bool {
    let check_len = data.len().min(8192);
    memchr::memchr(0, &data[..check_len]).is_some()
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Debug)]
pub struct FileResult {
    pub relative_path: String,
    pub found: FileDefinitions,
}

#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

pub struct IndexBuild {
    pub index: SourceIndex,
    pub skipped: Vec<SkippedFile>,
}

/// Walks `root` and extracts definitions from every source file into a fresh
/// index. Files that cannot be read are reported in `skipped`.
pub async fn build_index(root: &Path, exclude: Option<&Path>) -> Result<IndexBuild> {
    let walk_result = walk::walk_directory(root, exclude).await?;
    log::debug!("found {} source files under {}", walk_result.files.len(), root.display());

    let pb = ProgressBar::new(walk_result.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let semaphore = Arc::new(Semaphore::new(SEMAPHORE_PERMITS));
    let files = Arc::new(Mutex::new(Vec::new()));
    let skipped = Arc::new(Mutex::new(Vec::new()));

    let mut join_set = JoinSet::new();

    for file_path in walk_result.files {
        let semaphore = Arc::clone(&semaphore);
        let files = Arc::clone(&files);
        let skipped = Arc::clone(&skipped);
        let root = root.to_path_buf();
        let pb = pb.clone();

        join_set.spawn(async move {
            let _permit = semaphore.acquire().await;

            match process_file(&file_path, &root).await {
                Ok(Some(result)) => {
                    files.lock().await.push(result);
                }
                Ok(None) => {}
                Err(e) => {
                    skipped.lock().await.push(SkippedFile {
                        path: file_path,
                        reason: e.to_string(),
                    });
                }
            }

            pb.inc(1);
        });
    }

    while join_set.join_next().await.is_some() {}

    pb.finish_and_clear();

    let mut files = std::mem::take(&mut *files.lock().await);
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let mut index = SourceIndex::new(root);
    for file in files {
        index.insert(&file.relative_path, file.found);
    }

    let skipped = std::mem::take(&mut *skipped.lock().await);
    for skip in &skipped {
        log::warn!("skipped {}: {}", skip.path.display(), skip.reason);
    }

    Ok(IndexBuild { index, skipped })
}

async fn process_file(path: &Path, root: &Path) -> Result<Option<FileResult>> {
    let Some(language) = Language::from_path(path) else {
        return Ok(None);
    };

    let metadata = tokio::fs::metadata(path).await?;
    let size = metadata.len();

    if should_skip_file(size) {
        return Ok(None);
    }

    let relative_path = path
        .strip_prefix(root)
        .map(normalize_path)
        .unwrap_or_else(|_| normalize_path(path));

    let content = read::read_file(path, size).await?;

    if is_binary_content(&content) {
        return Ok(None);
    }

    let content_string = String::from_utf8_lossy(&content).into_owned();
    let relative_path_clone = relative_path.clone();
    let found = tokio::task::spawn_blocking(move || {
        parse::extract_definitions(language, &content_string, &relative_path_clone)
    })
    .await?;

    Ok(Some(FileResult {
        relative_path,
        found,
    }))
}
