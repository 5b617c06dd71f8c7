//! The note store: files addressed by logical title, not path.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::Error;

/// Narrow file-store contract. Reading or renaming a missing note is a
/// descriptive error, never a sentinel value.
pub trait FileStore: Send + Sync {
    fn read(&self, name: &str) -> Result<String, Error>;
    fn write(&self, name: &str, text: &str) -> Result<(), Error>;
    fn append(&self, name: &str, text: &str) -> Result<(), Error>;
    fn rename(&self, from: &str, to: &str) -> Result<(), Error>;
    fn exists(&self, name: &str) -> bool;
}

/// Notes stored as `<root>/<title>.md`.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.md"))
    }
}

impl FileStore for DirStore {
    fn read(&self, name: &str) -> Result<String, Error> {
        fs::read_to_string(self.path(name))
            .map_err(|_| Error::Collaborator(format!("{name}.md does not exist")))
    }

    fn write(&self, name: &str, text: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.root)
            .map_err(|e| Error::Collaborator(format!("could not create note store: {e}")))?;
        fs::write(self.path(name), text)
            .map_err(|e| Error::Collaborator(format!("could not write {name}.md: {e}")))
    }

    fn append(&self, name: &str, text: &str) -> Result<(), Error> {
        if !self.exists(name) {
            return self.write(name, text);
        }
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(self.path(name))
            .map_err(|e| Error::Collaborator(format!("could not open {name}.md: {e}")))?;
        file.write_all(text.as_bytes())
            .map_err(|e| Error::Collaborator(format!("could not append to {name}.md: {e}")))
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), Error> {
        if !self.exists(from) {
            return Err(Error::Collaborator(format!("could not find file {from}")));
        }
        fs::rename(self.path(from), self.path(to))
            .map_err(|e| Error::Collaborator(format!("could not rename {from}: {e}")))
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(label: &str) -> DirStore {
        let dir = std::env::temp_dir().join(format!("wren-{label}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        DirStore::new(dir)
    }

    #[test]
    fn write_read_append_rename() {
        let store = temp_store("files");
        store.write("daily", "morning\n").unwrap();
        assert_eq!(store.read("daily").unwrap(), "morning\n");

        store.append("daily", "evening\n").unwrap();
        assert_eq!(store.read("daily").unwrap(), "morning\nevening\n");

        store.rename("daily", "journal").unwrap();
        assert!(!store.exists("daily"));
        assert_eq!(store.read("journal").unwrap(), "morning\nevening\n");

        let _ = fs::remove_dir_all(&store.root);
    }

    #[test]
    fn missing_note_is_a_descriptive_error() {
        let store = temp_store("missing");
        match store.read("nope") {
            Err(Error::Collaborator(msg)) => assert!(msg.contains("nope.md")),
            other => panic!("expected a collaborator error, got {other:?}"),
        }
        assert!(matches!(
            store.rename("nope", "other"),
            Err(Error::Collaborator(_))
        ));
    }

    #[test]
    fn append_creates_a_missing_note() {
        let store = temp_store("append");
        store.append("fresh", "first line\n").unwrap();
        assert_eq!(store.read("fresh").unwrap(), "first line\n");
        let _ = fs::remove_dir_all(&store.root);
    }
}
