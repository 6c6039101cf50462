use anyhow::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::detect::find_source_root;
use crate::display;
use crate::error::SessedError;
use crate::extract::symbols::DefinitionKind;
use crate::index::{INDEX_FILE, SourceIndex};
use crate::pipeline::build_index;
use crate::session::read_lines;

pub async fn init<W: Write>(state_dir: &Path, root: Option<PathBuf>, out: &mut W) -> Result<()> {
    let root = find_source_root(root).await?;
    let build = build_index(&root, Some(state_dir)).await?;
    let index = build.index;

    index.save(&state_dir.join(INDEX_FILE)).await?;
    log::debug!(
        "index of {} saved, {} files skipped",
        root.display(),
        build.skipped.len()
    );

    writeln!(
        out,
        "indexed {} files: {} defs, {} classes ({} parsed heuristically)",
        index.files,
        index.count(DefinitionKind::Def),
        index.count(DefinitionKind::Class),
        index.heuristic_files
    )?;
    Ok(())
}

/// Prints every indexed definition of `name` with its header line.
pub async fn find<W: Write>(
    state_dir: &Path,
    kind: DefinitionKind,
    name: &str,
    out: &mut W,
) -> Result<()> {
    let index = SourceIndex::load(&state_dir.join(INDEX_FILE)).await?;
    let hits = index.lookup(kind, name);

    if hits.is_empty() {
        return Err(SessedError::SymbolNotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
        .into());
    }

    for hit in hits {
        let suffix = if hit.is_approximate() {
            " (approximate)"
        } else {
            ""
        };
        writeln!(out, "{}:{}{}", hit.path, hit.start + 1, suffix)?;

        let lines = match read_lines(&index.root.join(&hit.path)).await {
            Ok(lines) => lines,
            Err(e) => {
                writeln!(out, "  (unreadable since indexing: {})", e)?;
                continue;
            }
        };
        display::render(out, &lines, &[hit.start as i64], &HashSet::new(), None)?;
    }
    Ok(())
}
