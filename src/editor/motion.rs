//! Primitive cursor queries and mutations. All motions operate on the single
//! shared cursor of the active buffer; there is no multi-cursor support.

use super::{Editor, Position};

/// The current cursor position: the "to" end of any selection.
pub fn point(ed: &dyn Editor) -> Position {
    ed.cursor_to()
}

/// The position at the "from" end of the current selection; equals [`point`]
/// when nothing is selected.
pub fn mark(ed: &dyn Editor) -> Position {
    ed.cursor_from()
}

/// The position at the start of the buffer.
pub fn point_min() -> Position {
    Position::default()
}

/// The position at the end of the last line.
pub fn point_max(ed: &dyn Editor) -> Position {
    let last = ed.last_line();
    Position::new(last, ed.line(last).chars().count())
}

/// Move the cursor to an arbitrary position. Bounds checking is whatever the
/// underlying buffer performs.
pub fn jump(ed: &mut dyn Editor, pos: Position) {
    ed.set_cursor(pos);
}

/// Move the cursor to the start of `line`.
pub fn jump_line(ed: &mut dyn Editor, line: usize) {
    ed.set_cursor(Position::new(line, 0));
}

/// Advance the cursor by `count` characters on the current line only. Does
/// not wrap to the next line even when `count` runs past the end of the line.
pub fn forward_char(ed: &mut dyn Editor, count: usize) {
    let mut cursor = point(ed);
    cursor.ch += count;
    ed.set_cursor(cursor);
}

pub fn line_number(ed: &dyn Editor) -> usize {
    point(ed).line
}

/// The position at the end of the current line.
pub fn end_of_line_point(ed: &dyn Editor) -> Position {
    let cursor = point(ed);
    Position::new(cursor.line, ed.line(cursor.line).chars().count())
}

/// Move the cursor to the end of the current line.
pub fn end_of_line(ed: &mut dyn Editor) {
    let pos = end_of_line_point(ed);
    ed.set_cursor(pos);
}

pub fn at_end_of_buffer(ed: &dyn Editor) -> bool {
    point(ed) == point_max(ed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ScratchBuffer;

    #[test]
    fn jump_then_point_round_trips() {
        let mut buf = ScratchBuffer::from_text("hello\nworld");
        let target = Position::new(1, 3);
        jump(&mut buf, target);
        assert_eq!(point(&buf), target);
    }

    #[test]
    fn point_min_and_max() {
        let buf = ScratchBuffer::from_text("ab\ncdef");
        assert_eq!(point_min(), Position::new(0, 0));
        assert_eq!(point_max(&buf), Position::new(1, 4));
    }

    #[test]
    fn forward_char_does_not_wrap_to_the_next_line() {
        let mut buf = ScratchBuffer::from_text("hi\nthere");
        jump(&mut buf, Position::new(0, 1));
        forward_char(&mut buf, 10);
        assert_eq!(point(&buf), Position::new(0, 2));
    }

    #[test]
    fn forward_char_default_step() {
        let mut buf = ScratchBuffer::from_text("hello");
        forward_char(&mut buf, 1);
        assert_eq!(point(&buf), Position::new(0, 1));
    }

    #[test]
    fn end_of_line_moves_within_the_current_line() {
        let mut buf = ScratchBuffer::from_text("hello\nhi");
        jump(&mut buf, Position::new(0, 2));
        assert_eq!(end_of_line_point(&buf), Position::new(0, 5));
        end_of_line(&mut buf);
        assert_eq!(point(&buf), Position::new(0, 5));
    }

    #[test]
    fn at_end_of_buffer_only_at_point_max() {
        let mut buf = ScratchBuffer::from_text("ab\ncd");
        assert!(!at_end_of_buffer(&buf));
        let max = point_max(&buf);
        jump(&mut buf, max);
        assert!(at_end_of_buffer(&buf));
    }

    #[test]
    fn mark_tracks_the_selection_start() {
        let mut buf = ScratchBuffer::from_text("hello world");
        buf.set_selection(Position::new(0, 2), Position::new(0, 7));
        assert_eq!(mark(&buf), Position::new(0, 2));
        assert_eq!(point(&buf), Position::new(0, 7));

        jump(&mut buf, Position::new(0, 4));
        assert_eq!(mark(&buf), point(&buf));
    }
}
