use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::extract::language::Language;

pub struct WalkResult {
    pub files: Vec<PathBuf>,
}

/// Source files under `root` in a language we can index, honouring ignore
/// files. `exclude` (the state directory, when it lives inside the tree) is
/// skipped.
pub async fn walk_directory(root: &Path, exclude: Option<&Path>) -> Result<WalkResult> {
    let root = root.to_path_buf();
    let exclude = exclude.map(Path::to_path_buf);

    tokio::task::spawn_blocking(move || walk_directory_sync(&root, exclude.as_deref())).await?
}

fn walk_directory_sync(root: &Path, exclude: Option<&Path>) -> Result<WalkResult> {
    let files = Mutex::new(Vec::new());

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .parents(true)
        .threads(num_cpus::get())
        .build_parallel();

    walker.run(|| {
        let files = &files;

        Box::new(move |entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => return ignore::WalkState::Continue,
            };

            let path = entry.path();

            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                if path.file_name().is_some_and(|name| name == ".git")
                    || exclude.is_some_and(|dir| path.starts_with(dir))
                {
                    return ignore::WalkState::Skip;
                }
                return ignore::WalkState::Continue;
            }

            if Language::from_path(path).is_some() {
                if let Ok(mut files) = files.lock() {
                    files.push(path.to_path_buf());
                }
            }

            ignore::WalkState::Continue
        })
    });

    let mut files = files
        .into_inner()
        .map_err(|_| anyhow::anyhow!("walker thread panicked"))?;
    files.sort();

    Ok(WalkResult { files })
}
