//! The cursor/buffer layer: the narrow host-editor contract, a rope-backed
//! in-crate implementation, and the Emacs-style motion primitives built on
//! top of it.

mod buffer;
pub mod data;
pub mod motion;
mod position;
pub mod regexp;

pub use buffer::ScratchBuffer;
pub use position::{Position, Region};

use std::sync::{Arc, RwLock};

use crate::error::Error;

/// The host application's editor object, reduced to the operations the
/// scripting core needs. Positions handed to mutating methods are clipped to
/// buffer bounds the way host editors clip them.
pub trait Editor: Send + Sync {
    /// Sorted start of the current selection; equals the cursor when nothing
    /// is selected.
    fn cursor_from(&self) -> Position;

    /// Sorted end of the current selection; equals the cursor when nothing
    /// is selected.
    fn cursor_to(&self) -> Position;

    /// Move the cursor, collapsing any selection.
    fn set_cursor(&mut self, pos: Position);

    fn set_selection(&mut self, anchor: Position, head: Position);

    /// Text of line `idx` without its trailing newline.
    fn line(&self, idx: usize) -> String;

    /// Index of the last line.
    fn last_line(&self) -> usize;

    fn get_range(&self, from: Position, to: Position) -> String;

    fn replace_range(&mut self, text: &str, from: Position, to: Position);

    /// Text of the current selection, empty when there is none.
    fn selection(&self) -> String;
}

pub type SharedEditor = Arc<RwLock<dyn Editor>>;

/// Holds whichever buffer the host currently has focused. Capability
/// closures read through this at call time, so every invocation sees the
/// buffer that is active *now*, not the one active at registration.
#[derive(Clone, Default)]
pub struct EditorSlot {
    inner: Arc<RwLock<Option<SharedEditor>>>,
}

impl EditorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, editor: SharedEditor) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(editor);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = None;
        }
    }

    /// Run `f` against the active editor, or fail when the host has none.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn Editor) -> R) -> Result<R, Error> {
        let editor = self
            .inner
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or_else(|| Error::Collaborator("no active buffer".to_string()))?;
        let mut editor = editor
            .write()
            .map_err(|_| Error::Collaborator("buffer lock poisoned".to_string()))?;
        Ok(f(&mut *editor))
    }
}
