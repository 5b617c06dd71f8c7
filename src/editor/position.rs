use std::fmt;

use serde::{Deserialize, Serialize};

/// A location in an ordered sequence of text lines.
///
/// Ordering is line-major, then ch-major, which the `Ord` derive gives us
/// from the field order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{line: {}, ch: {}}}", self.line, self.ch)
    }
}

/// An ordered pair of positions delimiting a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: Position,
    pub end: Position,
}

impl Region {
    /// Build a region from two arbitrary positions by sorting them.
    pub fn from_points(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}
