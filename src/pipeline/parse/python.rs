use anyhow::{Result, anyhow};
use std::cell::RefCell;
use tree_sitter::{Node, Parser, Tree};

use crate::extract::symbols::{Definition, DefinitionKind};

use super::{body_end, node_text};

thread_local! {
    static PYTHON_PARSER: RefCell<Parser> = RefCell::new({
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_python::LANGUAGE.into()).expect("Python grammar");
        parser.set_timeout_micros(10_000_000);
        parser
    });
}

pub fn parse(content: &str) -> Result<Tree> {
    PYTHON_PARSER.with(|parser| {
        parser
            .borrow_mut()
            .parse(content, None)
            .ok_or_else(|| anyhow!("Failed to parse Python file"))
    })
}

/// Every function and class in the tree, nested ones included, in source
/// order.
pub fn collect_definitions(node: &Node, source: &[u8], definitions: &mut Vec<Definition>) {
    let kind = match node.kind() {
        "function_definition" => Some(DefinitionKind::Def),
        "class_definition" => Some(DefinitionKind::Class),
        _ => None,
    };

    if let Some(kind) = kind {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(&n, source))
            .unwrap_or_default();

        if !name.is_empty() {
            definitions.push(Definition {
                name,
                kind,
                start: node.start_position().row,
                end: Some(body_end(node)),
            });
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_definitions(&child, source, definitions);
    }
}
