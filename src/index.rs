mod types;

pub use types::{Occurrence, Occurrences};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SessedError;
use crate::extract::symbols::{DefinitionKind, Extraction, FileDefinitions};

pub const INDEX_FILE: &str = "index.bin";

/// Name to definition sites, split by kind. A rebuildable cache, not a source
/// of truth: entries go stale as soon as files change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceIndex {
    pub root: PathBuf,
    pub built_at: Option<DateTime<Utc>>,
    pub files: usize,
    pub heuristic_files: usize,
    pub defs: HashMap<String, Occurrences>,
    pub classes: HashMap<String, Occurrences>,
}

impl SourceIndex {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            built_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SessedError::IndexMissing.into());
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let index: SourceIndex = bincode::deserialize(&bytes)
            .with_context(|| format!("Corrupt source index {}; rerun `sessed init`", path.display()))?;
        Ok(index)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn insert(&mut self, relative_path: &str, found: FileDefinitions) {
        self.files += 1;
        if found.extraction == Extraction::Heuristic {
            self.heuristic_files += 1;
        }

        for definition in found.definitions {
            let map = match definition.kind {
                DefinitionKind::Def => &mut self.defs,
                DefinitionKind::Class => &mut self.classes,
            };
            map.entry(definition.name).or_default().push(Occurrence {
                path: relative_path.to_string(),
                start: definition.start,
                end: definition.end,
            });
        }
    }

    pub fn lookup(&self, kind: DefinitionKind, name: &str) -> &[Occurrence] {
        let map = match kind {
            DefinitionKind::Def => &self.defs,
            DefinitionKind::Class => &self.classes,
        };
        map.get(name).map(|hits| hits.as_slice()).unwrap_or(&[])
    }

    pub fn count(&self, kind: DefinitionKind) -> usize {
        let map = match kind {
            DefinitionKind::Def => &self.defs,
            DefinitionKind::Class => &self.classes,
        };
        map.values().map(|hits| hits.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::symbols::Definition;

    fn def(name: &str, kind: DefinitionKind, start: usize, end: Option<usize>) -> Definition {
        Definition {
            name: name.to_string(),
            kind,
            start,
            end,
        }
    }

    #[test]
    fn duplicates_across_files_are_kept() {
        let mut index = SourceIndex::new(Path::new("/src"));
        index.insert(
            "a.py",
            FileDefinitions {
                definitions: vec![def("run", DefinitionKind::Def, 3, Some(8))],
                extraction: Extraction::Structural,
            },
        );
        index.insert(
            "b.py",
            FileDefinitions {
                definitions: vec![
                    def("run", DefinitionKind::Def, 10, None),
                    def("Runner", DefinitionKind::Class, 1, None),
                ],
                extraction: Extraction::Heuristic,
            },
        );

        let hits = index.lookup(DefinitionKind::Def, "run");
        assert_eq!(hits.len(), 2);
        assert!(!hits[0].is_approximate());
        assert!(hits[1].is_approximate());
        assert!(index.lookup(DefinitionKind::Def, "Runner").is_empty());
        assert_eq!(index.lookup(DefinitionKind::Class, "Runner")[0].path, "b.py");
        assert_eq!((index.files, index.heuristic_files), (2, 1));
        assert_eq!(index.count(DefinitionKind::Def), 2);
    }

    #[test]
    fn survives_bincode() {
        let mut index = SourceIndex::new(Path::new("/src"));
        index.insert(
            "m.rs",
            FileDefinitions {
                definitions: vec![def("main", DefinitionKind::Def, 0, Some(3))],
                extraction: Extraction::Structural,
            },
        );
        let bytes = bincode::serialize(&index).unwrap();
        let decoded: SourceIndex = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.lookup(DefinitionKind::Def, "main"), index.lookup(DefinitionKind::Def, "main"));
        assert_eq!(decoded.root, PathBuf::from("/src"));
    }
}
