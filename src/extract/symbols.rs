use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefinitionKind {
    Def,
    Class,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Def => "def",
            DefinitionKind::Class => "class",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or type header found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    /// 0-based header line.
    pub start: usize,
    /// 0-based exclusive end of the body, `None` when the header was found
    /// textually and the extent is unknown.
    pub end: Option<usize>,
}

impl Definition {
    pub fn is_approximate(&self) -> bool {
        self.end.is_none()
    }
}

/// How a file's definitions were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extraction {
    Structural,
    Heuristic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDefinitions {
    pub definitions: Vec<Definition>,
    pub extraction: Extraction,
}
