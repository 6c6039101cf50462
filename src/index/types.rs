use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One place a name is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Relative to the index root, `/`-separated.
    pub path: String,
    /// 0-based header line.
    pub start: usize,
    /// 0-based exclusive end, `None` for textual matches.
    pub end: Option<usize>,
}

impl Occurrence {
    pub fn is_approximate(&self) -> bool {
        self.end.is_none()
    }
}

/// Most names are defined once.
pub type Occurrences = SmallVec<[Occurrence; 1]>;
