//! Range extraction and region editing built on the motion primitives.

use super::{Editor, Position, Region, motion};
use crate::error::Error;

/// Text between two positions, defaulting to the whole buffer.
pub fn buffer_string(ed: &dyn Editor, start: Option<Position>, end: Option<Position>) -> String {
    let start = start.unwrap_or_else(motion::point_min);
    let end = end.unwrap_or_else(|| motion::point_max(ed));
    ed.get_range(start, end)
}

/// Text from the current point to the end of the current line.
pub fn rest_of_line(ed: &dyn Editor) -> String {
    ed.get_range(motion::point(ed), motion::end_of_line_point(ed))
}

/// Full text of the line the cursor is on.
pub fn line_at_point(ed: &dyn Editor) -> String {
    ed.line(motion::point(ed).line)
}

pub fn selection_text(ed: &dyn Editor) -> String {
    ed.selection()
}

/// Insert `text` at the current point and advance the cursor by its character
/// count. Embedded newlines are not special-cased: the advance stays on the
/// insertion line, so multi-line inserts leave the cursor short of the
/// inserted text's true end.
pub fn insert(ed: &mut dyn Editor, text: &str) {
    let at = motion::point(ed);
    ed.replace_range(text, at, at);
    motion::forward_char(ed, text.chars().count());
}

/// Delete the text between two positions, defaulting to mark and point. The
/// positions are sorted first, so argument order does not matter.
pub fn kill(ed: &mut dyn Editor, pos1: Option<Position>, pos2: Option<Position>) {
    let a = pos1.unwrap_or_else(|| motion::mark(ed));
    let b = pos2.unwrap_or_else(|| motion::point(ed));
    let region = Region::from_points(a, b);
    ed.replace_range("", region.start, region.end);
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Grow a single-line region outward in both directions while the adjacent
/// characters satisfy `pred`. Regions spanning lines are rejected.
pub fn expand_region(
    ed: &dyn Editor,
    pred: impl Fn(char) -> bool,
    start: Position,
    end: Position,
) -> Result<Region, Error> {
    if start.line != end.line {
        return Err(Error::Motion(
            "region must start and end on the same line".to_string(),
        ));
    }
    let chars: Vec<char> = ed.line(start.line).chars().collect();
    let mut s = start.ch.min(chars.len());
    let mut e = end.ch.min(chars.len());
    while s >= 1 && pred(chars[s - 1]) {
        s -= 1;
    }
    while e < chars.len() && pred(chars[e]) {
        e += 1;
    }
    Ok(Region {
        start: Position::new(start.line, s),
        end: Position::new(end.line, e),
    })
}

/// The word under the cursor, found by expanding a one-character region over
/// the word-character predicate. Never crosses a line boundary.
pub fn word_at_point(ed: &dyn Editor) -> Result<String, Error> {
    let pos = motion::point(ed);
    let region = expand_region(ed, is_word_char, pos, Position::new(pos.line, pos.ch + 1))?;
    let chars: Vec<char> = ed.line(pos.line).chars().collect();
    let end = region.end.ch.min(chars.len());
    let start = region.start.ch.min(end);
    Ok(chars[start..end].iter().collect())
}
