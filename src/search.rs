//! Regex search over the open buffer.
//!
//! Every matching line is a hit; every line within `radius` of a hit is
//! context. Hits are starred, context is not, and the union is handed to the
//! display engine in line order.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};

const HIT: u8 = 2;
const CONTEXT: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    /// Sorted, deduplicated indices to render, already filtered to the buffer.
    pub indices: Vec<i64>,
    pub starred: HashSet<i64>,
    pub hits: usize,
}

pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

/// Scores each line of `lines` against `regex`. Returns `None` when nothing
/// matched.
pub fn plan(lines: &[String], regex: &Regex, radius: usize) -> Option<SearchPlan> {
    let radius = radius as i64;
    let mut levels: BTreeMap<i64, u8> = BTreeMap::new();
    let mut hits = 0;

    for (i, line) in lines.iter().enumerate() {
        if !regex.is_match(strip_terminator(line)) {
            continue;
        }
        hits += 1;
        let i = i as i64;
        for j in (i - radius)..=(i + radius) {
            let level = levels.entry(j).or_insert(CONTEXT);
            *level = (*level).max(CONTEXT);
        }
        levels.insert(i, HIT);
    }

    if hits == 0 {
        return None;
    }

    let len = lines.len() as i64;
    let mut indices = Vec::with_capacity(levels.len());
    let mut starred = HashSet::new();

    for (index, level) in levels {
        if index < 0 || index >= len {
            continue;
        }
        indices.push(index);
        if level >= HIT {
            starred.insert(index);
        }
    }

    Some(SearchPlan {
        indices,
        starred,
        hits,
    })
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
