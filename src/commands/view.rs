use anyhow::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use crate::cli::Direction;
use crate::config::Config;
use crate::error::SessedError;
use crate::extract::language::Language;
use crate::extract::scanner::{ScanOutcome, scan};
use crate::range::parse_range;
use crate::search;
use crate::session::Session;

pub async fn open<W: Write>(
    session: &mut Session,
    path: &str,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let absolute = match std::path::absolute(path) {
        Ok(p) if p.is_file() => p,
        _ => {
            session.close();
            return Err(SessedError::file_not_found(path).into());
        }
    };

    session.open(&absolute).await?;
    log::debug!("opened {} ({} lines)", absolute.display(), session.lines.len());

    summarize(session, &absolute, config, out)
}

/// Prints the top-level definition headers of a freshly opened file.
fn summarize<W: Write>(
    session: &mut Session,
    path: &Path,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let Some(language) = Language::from_path(path) else {
        return Ok(());
    };

    match scan(language, &session.lines, config.summary_max_defs) {
        ScanOutcome::Empty => {}
        ScanOutcome::TooMany(count) => {
            log::debug!("{} top-level headers, summary suppressed", count);
            writeln!(out, "Too many def lines, not displaying.")?;
        }
        ScanOutcome::Summary { indices, starred } => {
            writeln!(out, "def lines:")?;
            writeln!(out)?;
            let rendered =
                session.display(out, indices, &starred, Some(config.summary_max_lines))?;
            writeln!(out)?;
            if rendered.starred_shown < starred.len() {
                writeln!(
                    out,
                    "{} more def not displayed.",
                    starred.len() - rendered.starred_shown
                )?;
            }
        }
    }
    Ok(())
}

pub fn list<W: Write>(
    session: &mut Session,
    range: &str,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    session.path()?;
    let range = parse_range(range, Some(config.default_window))?;
    let end = range.end.min(session.lines.len() as i64);
    let indices: Vec<i64> = (range.begin..end).collect();

    writeln!(out)?;
    session.display(out, indices, &HashSet::new(), None)?;
    writeln!(out)?;
    Ok(())
}

pub fn search<W: Write>(
    session: &mut Session,
    pattern: &str,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    session.path()?;
    let regex = search::compile(pattern).map_err(SessedError::from)?;
    let plan = search::plan(&session.lines, &regex, config.search_radius)
        .ok_or(SessedError::NoMatches)?;

    let rendered = session.display(
        out,
        plan.indices,
        &plan.starred,
        Some(config.search_max_hits),
    )?;
    writeln!(out)?;

    if rendered.starred_shown < plan.hits {
        writeln!(
            out,
            "Found {} matches, first {} displayed.",
            plan.hits, rendered.starred_shown
        )?;
    }
    writeln!(
        out,
        "Use `sessed list <line>` to see the lines surrounding a match."
    )?;
    Ok(())
}

pub fn scroll<W: Write>(
    session: &mut Session,
    direction: Direction,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let shown = session
        .last_displayed
        .as_deref()
        .filter(|shown| !shown.is_empty())
        .ok_or(SessedError::CannotScroll)?;

    let begin = match direction {
        Direction::Down => {
            let last = shown.iter().copied().max().unwrap_or(0);
            last - config.scroll_down_overlap as i64
        }
        Direction::Up => {
            let first = shown.iter().copied().min().unwrap_or(0);
            first - config.scroll_up_back as i64
        }
    };

    let len = session.lines.len() as i64;
    let begin = begin.clamp(0, len);
    let end = (begin + config.scroll_span as i64).min(len);
    let indices: Vec<i64> = (begin..end).collect();

    session.display(out, indices, &HashSet::new(), None)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::split_lines;

    fn session_with(lines: usize) -> Session {
        let mut session = Session::new(5);
        session.path = Some("notes.txt".into());
        session.lines = split_lines(&(1..=lines).map(|i| format!("line {}\n", i)).collect::<String>());
        session
    }

    #[test]
    fn list_defaults_to_window() {
        let mut session = session_with(30);
        let mut out = Vec::new();
        list(&mut session, "5", &Config::default(), &mut out).unwrap();
        assert_eq!(session.last_displayed, Some((4..14).collect()));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\n   5|line 5\n"), "{}", text);
    }

    #[test]
    fn list_past_end_renders_nothing() {
        let mut session = session_with(3);
        session.last_displayed = Some(vec![0]);
        let mut out = Vec::new();
        list(&mut session, "10", &Config::default(), &mut out).unwrap();
        assert_eq!(session.last_displayed, None);
    }

    #[test]
    fn scroll_down_overlaps_previous_window() {
        let mut session = session_with(100);
        session.last_displayed = Some((0..10).collect());
        scroll(&mut session, Direction::Down, &Config::default(), &mut Vec::new()).unwrap();
        assert_eq!(session.last_displayed, Some((6..26).collect()));
    }

    #[test]
    fn scroll_down_from_middle_window() {
        let mut session = session_with(100);
        session.last_displayed = Some((10..20).collect());
        let mut out = Vec::new();
        scroll(&mut session, Direction::Down, &Config::default(), &mut out).unwrap();
        assert_eq!(session.last_displayed, Some((16..36).collect()));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("  17|line 17\n"), "{}", text);
    }

    #[test]
    fn scroll_up_clamps_at_top() {
        let mut session = session_with(100);
        session.last_displayed = Some((10..20).collect());
        scroll(&mut session, Direction::Up, &Config::default(), &mut Vec::new()).unwrap();
        assert_eq!(session.last_displayed, Some((0..20).collect()));
    }

    #[test]
    fn scroll_without_render_fails() {
        let mut session = session_with(10);
        let err = scroll(&mut session, Direction::Down, &Config::default(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessedError>(),
            Some(SessedError::CannotScroll)
        ));
    }

    #[test]
    fn search_reports_elided_hits() {
        let mut session = session_with(200);
        let config = Config {
            search_max_hits: 5,
            ..Config::default()
        };
        let mut out = Vec::new();
        search(&mut session, "line 1", &config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Found 111 matches, first"), "{}", text);
    }

    #[test]
    fn search_without_match_keeps_render_state() {
        let mut session = session_with(10);
        session.last_displayed = Some(vec![1, 2]);
        let err = search(&mut session, "absent", &Config::default(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessedError>(),
            Some(SessedError::NoMatches)
        ));
        assert_eq!(session.last_displayed, Some(vec![1, 2]));
    }
}
