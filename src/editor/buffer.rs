use ropey::Rope;

use super::{Editor, Position};

/// In-memory rope-backed buffer implementing the host [`Editor`] contract.
/// The demo binary edits one of these; tests use it as the stand-in for the
/// host application's document.
pub struct ScratchBuffer {
    text: Rope,
    cursor: Position,
    anchor: Option<Position>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            text: Rope::from_str(s),
            cursor: Position::default(),
            anchor: None,
        }
    }

    pub fn contents(&self) -> String {
        self.text.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    /// Length excluding the newline character.
    fn line_len(&self, idx: usize) -> usize {
        if idx >= self.text.len_lines() {
            return 0;
        }
        let line = self.text.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn clip(&self, pos: Position) -> Position {
        let line = pos.line.min(self.last_line());
        let ch = pos.ch.min(self.line_len(line));
        Position::new(line, ch)
    }

    fn char_index(&self, pos: Position) -> usize {
        let pos = self.clip(pos);
        self.text.line_to_char(pos.line) + pos.ch
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for ScratchBuffer {
    fn cursor_from(&self) -> Position {
        match self.anchor {
            Some(anchor) => anchor.min(self.cursor),
            None => self.cursor,
        }
    }

    fn cursor_to(&self) -> Position {
        match self.anchor {
            Some(anchor) => anchor.max(self.cursor),
            None => self.cursor,
        }
    }

    fn set_cursor(&mut self, pos: Position) {
        self.anchor = None;
        self.cursor = self.clip(pos);
    }

    fn set_selection(&mut self, anchor: Position, head: Position) {
        self.anchor = Some(self.clip(anchor));
        self.cursor = self.clip(head);
    }

    fn line(&self, idx: usize) -> String {
        if idx >= self.text.len_lines() {
            return String::new();
        }
        let mut s = self.text.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    fn last_line(&self) -> usize {
        self.text.len_lines().saturating_sub(1)
    }

    fn get_range(&self, from: Position, to: Position) -> String {
        let (a, b) = (self.char_index(from), self.char_index(to));
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        self.text.slice(a..b).to_string()
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let (a, b) = (self.char_index(from), self.char_index(to));
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        if a < b {
            self.text.remove(a..b);
        }
        if !text.is_empty() {
            self.text.insert(a, text);
        }
        // Keep the cursor and anchor inside the edited buffer.
        self.cursor = self.clip(self.cursor);
        if let Some(anchor) = self.anchor {
            self.anchor = Some(self.clip(anchor));
        }
    }

    fn selection(&self) -> String {
        self.get_range(self.cursor_from(), self.cursor_to())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = ScratchBuffer::new();
        assert_eq!(buf.line_count(), 1); // empty rope has 1 line
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn line_returns_content_without_newline() {
        let buf = ScratchBuffer::from_text("first\nsecond\nthird");
        assert_eq!(buf.line(0), "first");
        assert_eq!(buf.line(1), "second");
        assert_eq!(buf.line(2), "third");
        assert_eq!(buf.line(9), "");
    }

    #[test]
    fn last_line_counts_trailing_newline_segment() {
        let buf = ScratchBuffer::from_text("hello\nworld\n");
        assert_eq!(buf.last_line(), 2);
        assert_eq!(ScratchBuffer::from_text("hello").last_line(), 0);
    }

    #[test]
    fn set_cursor_clips_to_line_bounds() {
        let mut buf = ScratchBuffer::from_text("hello\nhi");
        buf.set_cursor(Position::new(0, 99));
        assert_eq!(buf.cursor_to(), Position::new(0, 5));
        buf.set_cursor(Position::new(99, 0));
        assert_eq!(buf.cursor_to(), Position::new(1, 0));
    }

    #[test]
    fn selection_endpoints_are_sorted() {
        let mut buf = ScratchBuffer::from_text("hello world");
        buf.set_selection(Position::new(0, 8), Position::new(0, 2));
        assert_eq!(buf.cursor_from(), Position::new(0, 2));
        assert_eq!(buf.cursor_to(), Position::new(0, 8));
        assert_eq!(buf.selection(), "llo wo");
    }

    #[test]
    fn set_cursor_collapses_selection() {
        let mut buf = ScratchBuffer::from_text("hello");
        buf.set_selection(Position::new(0, 0), Position::new(0, 4));
        buf.set_cursor(Position::new(0, 1));
        assert_eq!(buf.selection(), "");
        assert_eq!(buf.cursor_from(), buf.cursor_to());
    }

    #[test]
    fn get_range_accepts_reversed_arguments() {
        let buf = ScratchBuffer::from_text("one\ntwo\nthree");
        let a = Position::new(0, 1);
        let b = Position::new(2, 2);
        assert_eq!(buf.get_range(a, b), buf.get_range(b, a));
        assert_eq!(buf.get_range(a, b), "ne\ntwo\nth");
    }

    #[test]
    fn replace_range_edits_and_reclips_the_cursor() {
        let mut buf = ScratchBuffer::from_text("hello world");
        buf.set_cursor(Position::new(0, 11));
        buf.replace_range("", Position::new(0, 5), Position::new(0, 11));
        assert_eq!(buf.contents(), "hello");
        assert_eq!(buf.cursor_to(), Position::new(0, 5));

        buf.replace_range(" there", Position::new(0, 5), Position::new(0, 5));
        assert_eq!(buf.contents(), "hello there");
    }
}
