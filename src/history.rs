//! Linear history of submitted scripts with a recall cursor.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Past inputs plus an index used for previous/next recall. Once an entry
/// exists the index always stays within bounds; recall clamps at both ends
/// rather than wrapping.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and point the recall cursor at it.
    pub fn add(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
        self.index = self.entries.len() - 1;
    }

    /// Return the entry under the cursor, then step back, clamped at the
    /// oldest entry.
    pub fn previous(&mut self) -> Option<String> {
        let result = self.entries.get(self.index).cloned();
        self.index = self.index.saturating_sub(1);
        result
    }

    /// Step forward, clamped at the newest entry, then return the entry under
    /// the cursor. Deliberately not a mirror image of [`Self::previous`].
    pub fn next(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        self.index = (self.index + 1).min(self.entries.len() - 1);
        self.entries.get(self.index).cloned()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(io::Error::from)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let text = serde_json::to_string(self).map_err(io::Error::from)?;
        fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(entries: &[&str]) -> History {
        let mut h = History::new();
        for entry in entries {
            h.add(*entry);
        }
        h
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let mut h = History::new();
        assert_eq!(h.previous(), None);
        assert_eq!(h.next(), None);
    }

    #[test]
    fn add_points_the_cursor_at_the_new_entry() {
        let mut h = history(&["a", "b"]);
        assert_eq!(h.previous(), Some("b".to_string()));
    }

    #[test]
    fn previous_reads_then_steps_next_steps_then_reads() {
        // From index 2 over ["a", "b", "c"]: previous yields "c" and lands on
        // index 1; next then steps back to 2 and yields "c" again.
        let mut h = history(&["a", "b", "c"]);
        assert_eq!(h.previous(), Some("c".to_string()));
        assert_eq!(h.next(), Some("c".to_string()));
    }

    #[test]
    fn next_first_from_the_middle_is_not_a_mirror_image() {
        // Walk the cursor to index 1, then run next first: it steps to 2 and
        // yields "c"; previous then yields "c" and steps back to 1.
        let mut h = history(&["a", "b", "c"]);
        h.previous(); // yields "c", cursor now at index 1
        assert_eq!(h.next(), Some("c".to_string()));
        assert_eq!(h.previous(), Some("c".to_string()));
    }

    #[test]
    fn previous_clamps_at_the_oldest_entry() {
        let mut h = history(&["a", "b"]);
        assert_eq!(h.previous(), Some("b".to_string()));
        assert_eq!(h.previous(), Some("a".to_string()));
        assert_eq!(h.previous(), Some("a".to_string()));
        assert_eq!(h.previous(), Some("a".to_string()));
    }

    #[test]
    fn next_clamps_at_the_newest_entry() {
        let mut h = history(&["a", "b", "c"]);
        h.previous();
        h.previous();
        h.previous(); // cursor now at the oldest
        assert_eq!(h.next(), Some("b".to_string()));
        assert_eq!(h.next(), Some("c".to_string()));
        assert_eq!(h.next(), Some("c".to_string()));
    }

    #[test]
    fn round_trips_through_json() {
        let dir = std::env::temp_dir().join(format!("wren-history-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("history.json");

        let h = history(&["point()", "insert(\"x\")"]);
        h.save(&path).unwrap();
        let loaded = History::load(&path).unwrap();
        assert_eq!(loaded.entries(), h.entries());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
