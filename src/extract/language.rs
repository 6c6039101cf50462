use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Rust,
    Python,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "rs" => Some(Language::Rust),
            "py" | "pyi" => Some(Language::Python),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "Rust",
            Language::Python => "Python",
        }
    }

    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Keywords introducing a function header.
    pub fn def_keywords(&self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["fn"],
            Language::Python => &["def"],
        }
    }

    /// Keywords introducing a type header.
    pub fn class_keywords(&self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["struct", "enum", "trait", "union"],
            Language::Python => &["class"],
        }
    }

    /// Whether `prefix`, the text between a line's indentation and a
    /// definition keyword, may precede a header. Python allows nothing there.
    pub fn is_header_prefix(&self, prefix: &str) -> bool {
        prefix.split_whitespace().all(|word| self.is_modifier(word))
    }

    fn is_modifier(&self, word: &str) -> bool {
        match self {
            Language::Python => false,
            Language::Rust => {
                matches!(word, "pub" | "async" | "unsafe" | "const" | "extern" | "default")
                    || word.starts_with("pub(")
                    || (word.len() >= 2 && word.starts_with('"') && word.ends_with('"'))
            }
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
