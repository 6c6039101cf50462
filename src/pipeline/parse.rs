mod python;
mod rust;

use anyhow::{Result, anyhow};
use tree_sitter::{Node, Tree};

use crate::extract::heuristic;
use crate::extract::language::Language;
use crate::extract::symbols::{Definition, Extraction, FileDefinitions};

/// Something that can pull definition headers out of a source file.
pub trait DefinitionSource {
    fn extraction(&self) -> Extraction;

    fn definitions(&self, content: &str) -> Result<Vec<Definition>>;
}

/// tree-sitter backed extraction; fails on any syntax error in the file.
pub struct StructuralSource(pub Language);

/// Line-by-line keyword matching; never fails.
pub struct TextualSource(pub Language);

impl DefinitionSource for StructuralSource {
    fn extraction(&self) -> Extraction {
        Extraction::Structural
    }

    fn definitions(&self, content: &str) -> Result<Vec<Definition>> {
        let tree = parse_tree(self.0, content)?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(anyhow!("{} source has syntax errors", self.0));
        }

        let mut definitions = Vec::new();
        match self.0 {
            Language::Python => python::collect_definitions(&root, content.as_bytes(), &mut definitions),
            Language::Rust => rust::collect_definitions(&root, content.as_bytes(), &mut definitions),
        }
        Ok(definitions)
    }
}

impl DefinitionSource for TextualSource {
    fn extraction(&self) -> Extraction {
        Extraction::Heuristic
    }

    fn definitions(&self, content: &str) -> Result<Vec<Definition>> {
        Ok(heuristic::find_definitions(self.0, content))
    }
}

/// Tries each source in turn and keeps the first that succeeds.
pub fn extract_definitions(language: Language, content: &str, file_path: &str) -> FileDefinitions {
    let sources: [&dyn DefinitionSource; 2] =
        [&StructuralSource(language), &TextualSource(language)];

    for source in sources {
        match source.definitions(content) {
            Ok(definitions) => {
                return FileDefinitions {
                    definitions,
                    extraction: source.extraction(),
                };
            }
            Err(e) => log::debug!("{}: falling back from {:?}: {}", file_path, source.extraction(), e),
        }
    }

    FileDefinitions {
        definitions: Vec::new(),
        extraction: Extraction::Heuristic,
    }
}

pub fn parse_tree(language: Language, content: &str) -> Result<Tree> {
    match language {
        Language::Python => python::parse(content),
        Language::Rust => rust::parse(content),
    }
}

pub(crate) fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

/// Exclusive end line of a definition: one past the first line of the last
/// statement in its body.
pub(crate) fn body_end(node: &Node) -> usize {
    let header = node.start_position().row + 1;
    let Some(body) = node.child_by_field_name("body") else {
        return header;
    };

    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .last()
        .map(|last| last.start_position().row + 1)
        .unwrap_or(header)
}
