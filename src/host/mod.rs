//! External collaborators, consumed through narrow function contracts. The
//! real host application supplies its own implementations; the ones here
//! back the demo binary and the `testing` doubles back the test suite.

pub mod files;
pub mod process;
pub mod testing;
pub mod ui;

pub use files::{DirStore, FileStore};
pub use process::{ProcessRunner, SystemRunner, split_command};
pub use ui::{ConsoleUi, Ui};

use std::sync::{Arc, RwLock};

use crate::error::Error;

/// Clipboard access.
pub trait Clipboard: Send + Sync {
    fn get(&self) -> Result<String, Error>;
    fn put(&self, text: &str) -> Result<(), Error>;
}

/// In-process clipboard. Hosts with a real system clipboard swap in their
/// own implementation.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: RwLock<String>,
}

impl Clipboard for MemoryClipboard {
    fn get(&self) -> Result<String, Error> {
        Ok(self.contents.read().map(|c| c.clone()).unwrap_or_default())
    }

    fn put(&self, text: &str) -> Result<(), Error> {
        if let Ok(mut contents) = self.contents.write() {
            *contents = text.to_string();
        }
        Ok(())
    }
}

/// Opens URLs in whatever the platform considers a browser.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), Error>;
}

pub struct SystemUrlOpener;

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &str) -> Result<(), Error> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        std::process::Command::new(opener)
            .arg(url)
            .spawn()
            .map_err(|e| Error::Collaborator(format!("failed to open {url}: {e}")))?;
        Ok(())
    }
}

/// Everything the session borrows from the host application.
#[derive(Clone)]
pub struct Host {
    pub files: Arc<dyn FileStore>,
    pub ui: Arc<dyn Ui>,
    pub runner: Arc<dyn ProcessRunner>,
    pub clipboard: Arc<dyn Clipboard>,
    pub urls: Arc<dyn UrlOpener>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips() {
        let clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.get().unwrap(), "");
        clipboard.put("copied").unwrap();
        assert_eq!(clipboard.get().unwrap(), "copied");
    }
}
