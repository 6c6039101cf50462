//! Line-window renderer.
//!
//! Renders an arbitrary, possibly discontinuous list of 0-based indices as
//!
//! ```text
//!   8|    return x
//! *  9|def main():
//!  ...|
//!   42|main()
//! ```
//!
//! with a right-aligned number column, a `*` marker for starred lines and a
//! row of dots wherever two emitted lines are not adjacent.

use std::collections::HashSet;
use std::io::Write;

const MIN_MARGIN: usize = 3;

/// Result of one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Lines actually emitted, skipped indices excluded.
    pub emitted: usize,
    /// Starred indices that made it into the output.
    pub starred_shown: usize,
}

pub fn margin_for(indices: &[i64]) -> usize {
    let last = indices.last().copied().unwrap_or(0);
    MIN_MARGIN.max((last + 1).to_string().len())
}

/// Writes `indices` of `lines` into `out`.
///
/// Indices outside `[0, lines.len())` are skipped and do not count toward
/// `max_lines`. Rendering stops once `max_lines` lines were emitted.
pub fn render<W: Write>(
    out: &mut W,
    lines: &[String],
    indices: &[i64],
    starred: &HashSet<i64>,
    max_lines: Option<usize>,
) -> std::io::Result<Rendered> {
    let margin = margin_for(indices);
    let mut rendered = Rendered::default();
    let mut last: Option<i64> = None;

    for &index in indices {
        if index < 0 || index as usize >= lines.len() {
            continue;
        }
        if max_lines.is_some_and(|max| rendered.emitted >= max) {
            break;
        }

        if let Some(prev) = last {
            if prev + 1 < index {
                writeln!(out, " {}|", ".".repeat(margin))?;
            }
        }
        last = Some(index);

        let mark = if starred.contains(&index) {
            rendered.starred_shown += 1;
            '*'
        } else {
            ' '
        };

        writeln!(
            out,
            "{}{:>width$}|{}",
            mark,
            index + 1,
            lines[index as usize].trim_end(),
            width = margin
        )?;
        rendered.emitted += 1;
    }

    Ok(rendered)
}
