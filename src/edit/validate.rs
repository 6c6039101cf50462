//! Syntax gate for rewrites.
//!
//! The validator is chosen by file extension: files in a known language are
//! parsed with tree-sitter, everything else passes unchecked.

use std::io::Write;
use std::path::Path;
use tree_sitter::Node;

use crate::extract::language::Language;
use crate::pipeline::parse::{node_text, parse_tree};

const MAX_DIAGNOSTICS: usize = 5;
const SNIPPET_BEFORE: usize = 2;
const SNIPPET_AFTER: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub message: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, in bytes.
    pub column: usize,
    pub snippet: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}:{}:{}: {}", self.file, self.line, self.column, self.message)?;
        if let Some(snippet) = &self.snippet {
            write!(f, "{}", snippet)?;
        }
        Ok(())
    }
}

pub trait Validator {
    fn validate(&self, file: &str, lines: &[String]) -> Vec<Diagnostic>;
}

pub struct NoopValidator;

impl Validator for NoopValidator {
    fn validate(&self, _file: &str, _lines: &[String]) -> Vec<Diagnostic> {
        Vec::new()
    }
}

pub struct SyntaxValidator(pub Language);

impl Validator for SyntaxValidator {
    fn validate(&self, file: &str, lines: &[String]) -> Vec<Diagnostic> {
        let content = lines.concat();
        let tree = match parse_tree(self.0, &content) {
            Ok(tree) => tree,
            Err(e) => {
                return vec![Diagnostic {
                    file: file.to_string(),
                    message: e.to_string(),
                    line: 1,
                    column: 1,
                    snippet: None,
                }];
            }
        };

        let root = tree.root_node();
        let mut nodes = Vec::new();
        collect_error_nodes(&root, content.as_bytes(), &mut nodes);
        if nodes.is_empty() && root.has_error() {
            nodes.push(("invalid syntax".to_string(), 0, 0));
        }

        nodes
            .into_iter()
            .take(MAX_DIAGNOSTICS)
            .map(|(message, row, column)| Diagnostic {
                file: file.to_string(),
                message,
                line: row + 1,
                column: column + 1,
                snippet: snippet(lines, row, column + 1),
            })
            .collect()
    }
}

/// Picks the validator for `path`. With validation disabled every file gets
/// the no-op validator.
pub fn validator_for(path: &Path, enabled: bool) -> Box<dyn Validator> {
    match Language::from_path(path) {
        Some(language) if enabled => {
            log::debug!("validating {} as {}", path.display(), language);
            Box::new(SyntaxValidator(language))
        }
        _ => Box::new(NoopValidator),
    }
}

/// Outermost error and missing nodes, as `(message, row, column)`.
fn collect_error_nodes(node: &Node, source: &[u8], found: &mut Vec<(String, usize, usize)>) {
    let position = node.start_position();

    if node.is_missing() {
        found.push((format!("missing `{}`", node.kind()), position.row, position.column));
        return;
    }

    if node.is_error() {
        let text = node_text(node, source);
        let token = text.split_whitespace().next().unwrap_or("");
        let message = if token.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near `{}`", truncate(token, 20))
        };
        found.push((message, position.row, position.column));
        return;
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(&child, source, found);
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

/// A few lines around `row` with the offending line starred and a caret under
/// `column`.
fn snippet(lines: &[String], row: usize, column: usize) -> Option<String> {
    if row >= lines.len() {
        return None;
    }

    let begin = row.saturating_sub(SNIPPET_BEFORE);
    let end = (row + SNIPPET_AFTER).min(lines.len());
    let margin = end.to_string().len();
    let mut buffer = Vec::new();

    for (i, line) in lines.iter().enumerate().take(end).skip(begin) {
        let star = if i == row { '*' } else { ' ' };
        writeln!(buffer, "{}{:>width$}: {}", star, i + 1, line.trim_end(), width = margin).ok()?;
        if i == row {
            writeln!(buffer, "{}^", " ".repeat(1 + margin + 2 + column - 1)).ok()?;
        }
    }

    String::from_utf8(buffer).ok()
}

/// Operator-facing text for a rejected rewrite of `body`.
pub fn rejection_report(body: &[String], diagnostics: &[Diagnostic]) -> String {
    if body.iter().any(|line| line.contains("```")) {
        return "Do not quote your code with ```.  The input should contain only the rewritten lines.\n"
            .to_string();
    }

    let mut report = String::from("Syntax errors found.  Not saving.\n");
    for diagnostic in diagnostics {
        report.push_str(&diagnostic.to_string());
    }
    if body.len() > 10 {
        report.push_str("Try selecting fewer lines for modification.\n");
    }
    report
}
