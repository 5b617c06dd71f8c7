//! Search-by-scanning: advance the cursor until the rest of the current line
//! matches a pattern anchored at the cursor.

use regex::Regex;

use super::{Editor, Position, data, motion};
use crate::error::Error;

/// Rewrite `pattern` so it only matches at the start of the tested substring,
/// whether or not the caller supplied an anchor.
pub fn anchored(pattern: &str) -> Result<Regex, Error> {
    Regex::new(&format!("^(?:{pattern})"))
        .map_err(|e| Error::Evaluation(format!("invalid regexp /{pattern}/: {e}")))
}

/// Does the remainder of the current line match `re` at the cursor?
pub fn at_regexp(ed: &dyn Editor, re: &Regex) -> bool {
    re.is_match(&data::rest_of_line(ed))
}

/// Scan forward one position at a time until [`at_regexp`] holds. On success
/// the cursor is left at the first matching position; on reaching the end of
/// the buffer without a match the cursor is restored to where it started and
/// false is returned. No partial movement is observable on failure.
pub fn forward_regexp(ed: &mut dyn Editor, re: &Regex) -> bool {
    let start = motion::point(ed);
    loop {
        if at_regexp(ed, re) {
            return true;
        }
        if motion::at_end_of_buffer(ed) {
            motion::jump(ed, start);
            return false;
        }
        step_forward(ed);
    }
}

// `forward_char` never leaves the current line, so the scan itself steps to
// the next line's first column when the current line runs out.
fn step_forward(ed: &mut dyn Editor) {
    let pos = motion::point(ed);
    if pos.ch < ed.line(pos.line).chars().count() {
        motion::forward_char(ed, 1);
    } else {
        motion::jump(ed, Position::new(pos.line + 1, 0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ScratchBuffer;

    #[test]
    fn forward_regexp_stops_at_the_first_match() {
        let mut buf = ScratchBuffer::from_text("hello world");
        let re = anchored("world").unwrap();
        assert!(forward_regexp(&mut buf, &re));
        assert_eq!(motion::point(&buf), Position::new(0, 6));
    }

    #[test]
    fn forward_regexp_restores_the_cursor_on_failure() {
        let mut buf = ScratchBuffer::from_text("hello world");
        let re = anchored("zzz").unwrap();
        assert!(!forward_regexp(&mut buf, &re));
        assert_eq!(motion::point(&buf), Position::new(0, 0));
    }

    #[test]
    fn forward_regexp_crosses_line_boundaries() {
        let mut buf = ScratchBuffer::from_text("first line\nsecond target here");
        let re = anchored("target").unwrap();
        assert!(forward_regexp(&mut buf, &re));
        assert_eq!(motion::point(&buf), Position::new(1, 7));
    }

    #[test]
    fn caller_anchors_are_harmless() {
        let mut buf = ScratchBuffer::from_text("say hello");
        let re = anchored("^hello").unwrap();
        assert!(forward_regexp(&mut buf, &re));
        assert_eq!(motion::point(&buf), Position::new(0, 4));
    }

    #[test]
    fn anchoring_tests_matches_here_not_somewhere_later() {
        let buf = ScratchBuffer::from_text("hello world");
        let re = anchored("world").unwrap();
        // Cursor at column 0: the rest of the line contains "world" but does
        // not start with it.
        assert!(!at_regexp(&buf, &re));
    }

    #[test]
    fn invalid_pattern_is_an_evaluation_error() {
        assert!(matches!(anchored("("), Err(Error::Evaluation(_))));
    }
}
