//! Line ranges as typed by the operator.
//!
//! Input is 1-based and right-inclusive (`"10"`, `"30-45"`); the parsed
//! [`LineRange`] is 0-based and right-exclusive. Bounds are not checked
//! against any buffer here, callers clamp.

use serde::{Deserialize, Serialize};

use crate::error::SessedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub begin: i64,
    pub end: i64,
}

impl LineRange {
    pub fn new(begin: i64, end: i64) -> Self {
        Self { begin, end }
    }

    /// Clamps to `[0, len)`. `end` never drops below `begin`.
    pub fn clamp(&self, len: usize) -> (usize, usize) {
        let len = len as i64;
        let begin = self.begin.clamp(0, len);
        let end = self.end.clamp(begin, len);
        (begin as usize, end as usize)
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.begin + 1, self.end)
    }
}

/// Parses `"N"` or `"M-N"`.
///
/// A single `N` spans `default_window` lines starting at `N` when a window is
/// given, otherwise just line `N`. A pair is taken verbatim, without swapping.
pub fn parse_range(input: &str, default_window: Option<usize>) -> Result<LineRange, SessedError> {
    let numbers = input
        .split('-')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| SessedError::invalid_range(input))?;

    let range = match numbers.as_slice() {
        [n] => {
            let begin = n.checked_sub(1);
            let end = match default_window {
                Some(window) => begin
                    .zip(i64::try_from(window).ok())
                    .and_then(|(begin, window)| begin.checked_add(window)),
                None => Some(*n),
            };
            begin.zip(end)
        }
        [m, n] => m.checked_sub(1).map(|begin| (begin, *n)),
        _ => None,
    };

    range
        .map(|(begin, end)| LineRange::new(begin, end))
        .ok_or_else(|| SessedError::invalid_range(input))
}
