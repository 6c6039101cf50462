//! Textual definition finder, used when a file does not parse.
//!
//! A keyword followed by an identifier is taken as a header wherever it
//! appears on a line. Nothing is known about where the body ends.

use super::language::Language;
use super::scanner::find_word;
use super::symbols::{Definition, DefinitionKind};

pub fn find_definitions(language: Language, content: &str) -> Vec<Definition> {
    let mut definitions = Vec::new();

    for (i, line) in content.split('\n').enumerate() {
        for (keywords, kind) in [
            (language.def_keywords(), DefinitionKind::Def),
            (language.class_keywords(), DefinitionKind::Class),
        ] {
            for keyword in keywords {
                if let Some(name) = name_after(line, keyword) {
                    definitions.push(Definition {
                        name,
                        kind,
                        start: i,
                        end: None,
                    });
                }
            }
        }
    }

    definitions
}

fn name_after(line: &str, keyword: &str) -> Option<String> {
    let needle = format!("{} ", keyword);
    let offset = find_word(line, &needle)?;
    let rest = line[offset + needle.len()..].trim_start();
    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    (!name.is_empty()).then_some(name)
}
