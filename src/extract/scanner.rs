//! Open-time orientation: the top-level function headers of one buffer.
//!
//! A header counts as top-level when its indentation equals the smallest
//! indentation seen among all headers of the file, so nested definitions are
//! hidden. Headers whose parameter list is not closed on the same line pull
//! in up to two continuation lines.

use std::collections::HashSet;

use super::language::Language;

const MAX_CONTINUATION: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No header in the buffer.
    Empty,
    /// More top-level headers than the summary limit.
    TooMany(usize),
    Summary {
        indices: Vec<i64>,
        starred: HashSet<i64>,
    },
}

/// Indentation of a header on `line`, or `None` when `line` is not one.
pub fn header_indent(language: Language, line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start().len();
    let body = &line[indent..];

    language.def_keywords().iter().find_map(|keyword| {
        let needle = format!("{} ", keyword);
        let offset = find_word(body, &needle)?;
        language.is_header_prefix(&body[..offset]).then_some(indent)
    })
}

/// First occurrence of `needle` not glued to a preceding identifier.
pub(crate) fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(i, _)| i).find(|&i| {
        haystack[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}

pub fn scan(language: Language, lines: &[String], max_defs: usize) -> ScanOutcome {
    let headers: Vec<(usize, usize)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| header_indent(language, line).map(|indent| (i, indent)))
        .collect();

    let Some(min_indent) = headers.iter().map(|&(_, indent)| indent).min() else {
        return ScanOutcome::Empty;
    };

    let mut indices = Vec::new();
    let mut starred = HashSet::new();

    for &(i, indent) in &headers {
        if indent > min_indent {
            continue;
        }
        indices.push(i as i64);
        starred.insert(i as i64);

        let mut header = lines[i].clone();
        if !header.contains('(') {
            continue;
        }
        let mut j = i;
        while !header.contains(')') && j < i + MAX_CONTINUATION {
            j += 1;
            if j >= lines.len() {
                break;
            }
            indices.push(j as i64);
            header.push_str(&lines[j]);
        }
    }

    if starred.len() > max_defs {
        return ScanOutcome::TooMany(starred.len());
    }

    ScanOutcome::Summary { indices, starred }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::split_lines;

    #[test]
    fn only_minimum_indentation_is_summarised() {
        let lines = split_lines(
            "import os\n\ndef outer(a):\n    def inner():\n        pass\n    return a\n\ndef other():\n    pass\n",
        );
        let ScanOutcome::Summary { indices, starred } = scan(Language::Python, &lines, 20) else {
            panic!("expected a summary");
        };
        assert_eq!(indices, vec![2, 7]);
        assert_eq!(starred, HashSet::from([2, 7]));
    }

    #[test]
    fn methods_are_top_level_when_nothing_is_shallower() {
        let lines = split_lines("class A:\n    def f(self):\n        pass\n    def g(self):\n        pass\n");
        let ScanOutcome::Summary { starred, .. } = scan(Language::Python, &lines, 20) else {
            panic!("expected a summary");
        };
        assert_eq!(starred, HashSet::from([1, 3]));
    }

    #[test]
    fn open_parameter_lists_pull_continuation_lines() {
        let lines = split_lines("def f(a,\n      b,\n      c,\n      d):\n    pass\n");
        let ScanOutcome::Summary { indices, starred } = scan(Language::Python, &lines, 20) else {
            panic!("expected a summary");
        };
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(starred, HashSet::from([0]));
    }

    #[test]
    fn too_many_headers_suppresses_summary() {
        let text: String = (0..21).map(|i| format!("def f{}():\n    pass\n", i)).collect();
        let lines = split_lines(&text);
        assert_eq!(scan(Language::Python, &lines, 20), ScanOutcome::TooMany(21));
    }

    #[test]
    fn prose_mentioning_def_is_not_a_header() {
        let lines = split_lines("x = 'undef y'\n# see def below\nundef z\n");
        assert_eq!(scan(Language::Python, &lines, 20), ScanOutcome::Empty);
    }

    #[test]
    fn rust_headers_accept_modifiers() {
        let lines = split_lines(
            "pub fn a() {}\nimpl X {\n    pub(crate) async fn b(&self) {}\n}\nunsafe extern \"C\" fn c() {}\nlet f = fn_ptr;\n",
        );
        let ScanOutcome::Summary { starred, .. } = scan(Language::Rust, &lines, 20) else {
            panic!("expected a summary");
        };
        assert_eq!(starred, HashSet::from([0, 4]));
    }
}
