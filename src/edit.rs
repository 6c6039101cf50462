//! Two-step edit protocol.
//!
//! `select` stages a range in the session; a later invocation's `rewrite`
//! splices new text into that range. The candidate file must pass the
//! validator for its type before anything is written. A rejected rewrite
//! keeps both the file and the staged range as they were.

pub mod validate;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use tokio::fs;

use crate::config::Config;
use crate::error::SessedError;
use crate::range::LineRange;
use crate::session::{Session, split_lines};
use validate::{rejection_report, validator_for};

/// The buffer after replacing `[begin, end)` with a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub lines: Vec<String>,
    /// Where the body landed in `lines`.
    pub new_begin: usize,
    pub new_end: usize,
    /// How many original lines were replaced.
    pub replaced: usize,
}

/// Splits `text` into lines, terminating the last one.
pub fn body_lines(text: &str) -> Vec<String> {
    let mut body = split_lines(text);
    if let Some(last) = body.last_mut() {
        if !last.ends_with('\n') {
            last.push('\n');
        }
    }
    body
}

pub fn splice(lines: &[String], begin: usize, end: usize, body: Vec<String>) -> Splice {
    let mut spliced = Vec::with_capacity(lines.len() - (end - begin) + body.len());
    spliced.extend_from_slice(&lines[..begin]);
    let new_begin = spliced.len();
    spliced.extend(body);
    let new_end = spliced.len();
    spliced.extend_from_slice(&lines[end..]);

    Splice {
        lines: spliced,
        new_begin,
        new_end,
        replaced: end - begin,
    }
}

/// Checks `range` against the buffer: it must start inside the buffer (any
/// start is fine for an empty one) and not run backwards. The end is clamped.
fn checked_range(session: &Session, range: LineRange) -> Result<(usize, usize), SessedError> {
    let len = session.lines.len() as i64;
    let outside = range.begin >= len && len > 0;
    if range.begin < 0 || outside || range.end < range.begin {
        return Err(SessedError::invalid_range(range.to_string()));
    }
    Ok(range.clamp(session.lines.len()))
}

/// Stages `range` for the next `rewrite` and echoes the selected lines.
pub fn select<W: Write>(session: &mut Session, range: LineRange, out: &mut W) -> Result<()> {
    session.path()?;
    let (begin, end) = checked_range(session, range)?;

    writeln!(out, "--- begin of selection ---")?;
    for line in &session.lines[begin..end] {
        write!(out, "{}", line)?;
        if !line.ends_with('\n') {
            writeln!(out)?;
        }
    }
    writeln!(out, "--- end of selection ---")?;
    writeln!(
        out,
        "Check the above. If these are the lines you intend to modify, proceed with `sessed rewrite`. \
         If the selected range is not correct, select again."
    )?;

    session.selection = Some(LineRange::new(begin as i64, end as i64));
    session.last_displayed = None;
    log::debug!("selection staged: [{}, {})", begin, end);
    Ok(())
}

/// Replaces the staged selection with `text`.
pub async fn rewrite<W: Write>(
    session: &mut Session,
    text: &str,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    session.path()?;
    let selection = session.selection.ok_or(SessedError::NoSelectionPending)?;
    replace(session, selection, text, config, out).await
}

/// Validates and commits the replacement of `range` with `text`. On success
/// the selection is consumed and the edited region is shown with context.
pub async fn replace<W: Write>(
    session: &mut Session,
    range: LineRange,
    text: &str,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let path = session.path()?.to_path_buf();
    let (begin, end) = checked_range(session, range)?;
    let body = body_lines(text);
    let candidate = splice(&session.lines, begin, end, body.clone());

    let file = path.display().to_string();
    let diagnostics = validator_for(&path, config.validate).validate(&file, &candidate.lines);
    if !diagnostics.is_empty() {
        log::debug!("rewrite of {} rejected with {} diagnostics", file, diagnostics.len());
        let report = rejection_report(&body, &diagnostics);
        return Err(SessedError::SyntaxRejected { report }.into());
    }

    fs::write(&path, candidate.lines.concat())
        .await
        .with_context(|| format!("Failed to write {}", file))?;
    session.reload().await?;
    session.selection = None;

    writeln!(out, "{} lines rewritten, new content:", candidate.replaced)?;

    let context = config.rewrite_context;
    let after = (candidate.new_end + context).min(session.lines.len());
    let indices: Vec<i64> = (candidate.new_begin.saturating_sub(context)..after)
        .map(|i| i as i64)
        .collect();
    let starred: HashSet<i64> = (candidate.new_begin..candidate.new_end)
        .map(|i| i as i64)
        .collect();
    session.display(out, indices, &starred, None)?;

    writeln!(out)?;
    writeln!(out, "If you don't like this, you need to revert with git.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}\n", i)).collect()
    }

    #[test]
    fn body_gets_a_final_terminator() {
        assert_eq!(body_lines("a\nb"), vec!["a\n", "b\n"]);
        assert_eq!(body_lines("a\n"), vec!["a\n"]);
        assert!(body_lines("").is_empty());
    }

    #[test]
    fn splice_keeps_surrounding_lines() {
        let original = lines(10);
        let result = splice(&original, 2, 5, body_lines("x\ny\nz\n"));
        assert_eq!(result.lines.len(), 10);
        assert_eq!(&result.lines[..2], &original[..2]);
        assert_eq!(&result.lines[2..5], &["x\n", "y\n", "z\n"]);
        assert_eq!(&result.lines[5..], &original[5..]);
        assert_eq!((result.new_begin, result.new_end, result.replaced), (2, 5, 3));
    }

    #[test]
    fn empty_body_deletes() {
        let result = splice(&lines(4), 1, 3, Vec::new());
        assert_eq!(result.lines, vec!["0\n", "3\n"]);
        assert_eq!((result.new_begin, result.new_end), (1, 1));
    }

    #[test]
    fn empty_range_inserts() {
        let result = splice(&lines(2), 2, 2, body_lines("tail"));
        assert_eq!(result.lines, vec!["0\n", "1\n", "tail\n"]);
    }

    #[test]
    fn select_stages_clamped_range() {
        let mut session = Session::new(5);
        session.path = Some("a.txt".into());
        session.lines = lines(5);
        session.last_displayed = Some(vec![0, 1]);

        let mut out = Vec::new();
        select(&mut session, LineRange::new(3, 40), &mut out).unwrap();

        assert_eq!(session.selection, Some(LineRange::new(3, 5)));
        assert_eq!(session.last_displayed, None);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("--- begin of selection ---\n3\n4\n--- end of selection ---\n"));
    }

    #[test]
    fn select_without_file_fails() {
        let mut session = Session::new(5);
        let err = select(&mut session, LineRange::new(0, 1), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessedError>(),
            Some(SessedError::NoFileLoaded)
        ));
    }

    #[test]
    fn select_past_end_is_invalid() {
        let mut session = Session::new(5);
        session.path = Some("a.txt".into());
        session.lines = lines(3);
        let err = select(&mut session, LineRange::new(7, 9), &mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessedError>(),
            Some(SessedError::InvalidRange { .. })
        ));
        assert_eq!(session.selection, None);
    }
}
