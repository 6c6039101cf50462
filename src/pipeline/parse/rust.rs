use anyhow::{Result, anyhow};
use std::cell::RefCell;
use tree_sitter::{Node, Parser, Tree};

use crate::extract::symbols::{Definition, DefinitionKind};

use super::node_text;

thread_local! {
    static PARSER: RefCell<Parser> = RefCell::new({
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_rust::LANGUAGE.into()).expect("Rust grammar");
        parser.set_timeout_micros(10_000_000);
        parser
    });
}

pub fn parse(content: &str) -> Result<Tree> {
    PARSER.with(|parser| {
        parser
            .borrow_mut()
            .parse(content, None)
            .ok_or_else(|| anyhow!("Failed to parse file"))
    })
}

fn definition_kind(kind: &str) -> Option<DefinitionKind> {
    match kind {
        "function_item" | "function_signature_item" => Some(DefinitionKind::Def),
        "struct_item" | "enum_item" | "trait_item" | "union_item" => Some(DefinitionKind::Class),
        _ => None,
    }
}

/// Functions (including trait and impl methods) and type items, in source
/// order. Items end on the line of their closing token.
pub fn collect_definitions(node: &Node, source: &[u8], definitions: &mut Vec<Definition>) {
    if let Some(kind) = definition_kind(node.kind()) {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(&n, source))
            .unwrap_or_default();

        if !name.is_empty() {
            definitions.push(Definition {
                name,
                kind,
                start: node.start_position().row,
                end: Some(node.end_position().row + 1),
            });
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_definitions(&child, source, definitions);
    }
}
