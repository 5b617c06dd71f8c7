//! In-memory collaborator doubles for the test suite and embedding
//! experiments.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use rhai::Dynamic;

use super::{Clipboard, FileStore, Host, MemoryClipboard, ProcessRunner, Ui, UrlOpener};
use crate::error::Error;
use crate::scripting::Pending;

/// Note store backed by a map.
#[derive(Default)]
pub struct MemoryStore {
    notes: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(self, name: &str, text: &str) -> Self {
        if let Ok(mut notes) = self.notes.write() {
            notes.insert(name.to_string(), text.to_string());
        }
        self
    }

    pub fn snapshot(&self, name: &str) -> Option<String> {
        self.notes.read().ok().and_then(|notes| notes.get(name).cloned())
    }
}

impl FileStore for MemoryStore {
    fn read(&self, name: &str) -> Result<String, Error> {
        self.snapshot(name)
            .ok_or_else(|| Error::Collaborator(format!("{name}.md does not exist")))
    }

    fn write(&self, name: &str, text: &str) -> Result<(), Error> {
        if let Ok(mut notes) = self.notes.write() {
            notes.insert(name.to_string(), text.to_string());
        }
        Ok(())
    }

    fn append(&self, name: &str, text: &str) -> Result<(), Error> {
        if let Ok(mut notes) = self.notes.write() {
            notes.entry(name.to_string()).or_default().push_str(text);
        }
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), Error> {
        let mut notes = self
            .notes
            .write()
            .map_err(|_| Error::Collaborator("note store poisoned".to_string()))?;
        match notes.remove(from) {
            Some(text) => {
                notes.insert(to.to_string(), text);
                Ok(())
            }
            None => Err(Error::Collaborator(format!("could not find file {from}"))),
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.notes
            .read()
            .map(|notes| notes.contains_key(name))
            .unwrap_or(false)
    }
}

/// UI double: prompts answer from a canned queue, messages are recorded.
#[derive(Default)]
pub struct ScriptedUi {
    responses: Mutex<VecDeque<String>>,
    messages: Mutex<Vec<String>>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: &str) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response.to_string());
        }
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn next_response(&self) -> Option<String> {
        self.responses.lock().ok().and_then(|mut r| r.pop_front())
    }
}

impl Ui for ScriptedUi {
    fn prompt_string(&self, label: &str) -> Pending {
        match self.next_response() {
            Some(response) => Pending::resolved(Dynamic::from(response)),
            None => Pending::rejected(format!("prompt: {label}"), "prompt cancelled"),
        }
    }

    fn select_from_list(&self, choices: Vec<String>, label: &str) -> Pending {
        if let Some(response) = self.next_response() {
            return Pending::resolved(Dynamic::from(response));
        }
        match choices.into_iter().next() {
            Some(first) => Pending::resolved(Dynamic::from(first)),
            None => Pending::rejected(format!("select: {label}"), "nothing to select"),
        }
    }

    fn show_message(&self, text: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
    }

    fn show_popup(&self, text: &str) -> Pending {
        self.show_message(text);
        Pending::resolved(Dynamic::UNIT)
    }
}

/// Runner double: records every call and answers with fixed stdout.
#[derive(Default)]
pub struct StaticRunner {
    stdout: String,
    calls: Mutex<Vec<(Vec<String>, Option<String>)>>,
}

impl StaticRunner {
    pub fn new(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<String>, Option<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ProcessRunner for StaticRunner {
    fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<String, Error> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((argv.to_vec(), stdin.map(str::to_string)));
        }
        Ok(self.stdout.clone())
    }
}

#[derive(Default)]
pub struct NullUrlOpener {
    opened: Mutex<Vec<String>>,
}

impl NullUrlOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl UrlOpener for NullUrlOpener {
    fn open(&self, url: &str) -> Result<(), Error> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_string());
        }
        Ok(())
    }
}

/// A full set of doubles plus concrete handles for assertions.
pub struct TestHost {
    pub host: Host,
    pub files: Arc<MemoryStore>,
    pub ui: Arc<ScriptedUi>,
    pub runner: Arc<StaticRunner>,
    pub clipboard: Arc<MemoryClipboard>,
    pub urls: Arc<NullUrlOpener>,
}

impl TestHost {
    pub fn new() -> Self {
        Self::build(MemoryStore::new(), ScriptedUi::new(), StaticRunner::new(""))
    }

    pub fn build(files: MemoryStore, ui: ScriptedUi, runner: StaticRunner) -> Self {
        let files = Arc::new(files);
        let ui = Arc::new(ui);
        let runner = Arc::new(runner);
        let clipboard = Arc::new(MemoryClipboard::default());
        let urls = Arc::new(NullUrlOpener::default());
        let host = Host {
            files: files.clone() as Arc<dyn FileStore>,
            ui: ui.clone() as Arc<dyn Ui>,
            runner: runner.clone() as Arc<dyn ProcessRunner>,
            clipboard: clipboard.clone() as Arc<dyn Clipboard>,
            urls: urls.clone() as Arc<dyn UrlOpener>,
        };
        Self {
            host,
            files,
            ui,
            runner,
            clipboard,
            urls,
        }
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}
