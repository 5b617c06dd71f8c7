//! The scripting session: owns the evaluator, the binding table, history,
//! and the command registry, and is the single layer where errors become
//! user-visible messages instead of escaping into the host.

use std::path::Path;
use std::sync::{Arc, RwLock};

use rhai::Dynamic;

use crate::command::CommandRegistry;
use crate::editor::{EditorSlot, Position, SharedEditor, motion};
use crate::error::Error;
use crate::history::History;
use crate::host::Host;
use crate::scripting::scope::{Ambient, Bindings, ERROR_SLOT, RESULT_SLOT};
use crate::scripting::{Docs, Pending, ScriptEngine, api, format_value};

pub struct Session {
    engine: ScriptEngine,
    bindings: Bindings,
    editor: EditorSlot,
    history: Arc<RwLock<History>>,
    registry: Arc<RwLock<CommandRegistry>>,
    docs: Docs,
    host: Host,
    path: Option<String>,
    init_loaded: bool,
}

impl Session {
    pub fn new(host: Host) -> Self {
        Self::with_ambient(host, Ambient::new())
    }

    pub fn with_ambient(host: Host, ambient: Ambient) -> Self {
        let bindings = Bindings::new();
        let mut engine = ScriptEngine::new(bindings.clone(), ambient);
        let editor = EditorSlot::new();
        let history = Arc::new(RwLock::new(History::new()));
        let registry = Arc::new(RwLock::new(CommandRegistry::new()));
        let docs = Docs::default();

        engine.register_module(api::editor_module(editor.clone(), &docs));
        engine.register_module(api::file_module(host.files.clone(), &docs));
        engine.register_module(api::ui_module(host.ui.clone(), &docs));
        engine.register_module(api::process_module(
            host.runner.clone(),
            host.clipboard.clone(),
            host.urls.clone(),
            &docs,
        ));
        engine.register_module(api::session_module(
            registry.clone(),
            engine.library(),
            host.files.clone(),
            bindings.clone(),
            history.clone(),
            host.ui.clone(),
            &docs,
        ));

        Self {
            engine,
            bindings,
            editor,
            history,
            registry,
            docs,
            host,
            path: None,
            init_loaded: false,
        }
    }

    /// Install the buffer and note title the host currently has focused.
    pub fn activate(&mut self, editor: SharedEditor, path: Option<String>) {
        self.editor.install(editor);
        self.path = path;
    }

    pub fn bindings(&self) -> Bindings {
        self.bindings.clone()
    }

    pub fn history(&self) -> Arc<RwLock<History>> {
        self.history.clone()
    }

    pub fn registry(&self) -> Arc<RwLock<CommandRegistry>> {
        self.registry.clone()
    }

    pub fn function_docs(&self) -> Vec<String> {
        self.docs.entries()
    }

    /// Reinstall the state-dependent bindings from current app state. Runs
    /// before every evaluation and command invocation; entries it does not
    /// touch persist from earlier evaluations.
    fn refresh_scope(&self) {
        match &self.path {
            Some(path) => self.bindings.set("path", Dynamic::from(path.clone())),
            None => self.bindings.set("path", Dynamic::UNIT),
        }
    }

    /// Evaluate a script against the current state and return the raw value.
    pub fn eval_value(&self, script: &str) -> Result<Dynamic, Error> {
        self.refresh_scope();
        tracing::debug!(script, "evaluating");
        let result = self.engine.eval(script)?;
        if let Some(pending) = result.clone().try_cast::<Pending>() {
            self.watch(pending);
        }
        Ok(result)
    }

    /// Evaluate a script and format the result for display or insertion.
    pub fn run_command(&self, script: &str) -> Result<String, Error> {
        self.eval_value(script).map(|value| format_value(&value))
    }

    /// Watch a pending result. Whenever it settles, the reserved slots are
    /// overwritten; two in-flight pendings race for them and the last to
    /// settle wins.
    fn watch(&self, pending: Pending) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(label = pending.label(), "no async runtime; pending result dropped");
            return;
        };
        let bindings = self.bindings.clone();
        let ui = self.host.ui.clone();
        handle.spawn(async move {
            match pending.wait().await {
                Ok(value) => {
                    ui.show_message(&format!("async result: {}", format_value(&value)));
                    bindings.set(RESULT_SLOT, value);
                    bindings.set(ERROR_SLOT, Dynamic::UNIT);
                }
                Err(error) => {
                    tracing::warn!(%error, "pending value failed");
                    ui.show_message(&format!("async error: {error} (see {ERROR_SLOT})"));
                    bindings.set(ERROR_SLOT, Dynamic::from(error));
                    bindings.set(RESULT_SLOT, Dynamic::UNIT);
                }
            }
        });
    }

    fn current_region(&self) -> Result<String, Error> {
        self.editor.with(|ed| {
            let selection = ed.selection();
            if selection.is_empty() {
                ed.line(motion::point(ed).line)
            } else {
                selection
            }
        })
    }

    /// Evaluate the selection (or current line) and insert the formatted
    /// result on the following line.
    pub fn eval_selection(&self) {
        if let Err(error) = self.try_eval_selection() {
            self.host.ui.show_message(&error.to_string());
        }
    }

    fn try_eval_selection(&self) -> Result<(), Error> {
        let region = self.current_region()?;
        let cursor = self.editor.with(|ed| motion::point(ed))?;
        let output = self.run_command(&region)?;
        self.editor.with(|ed| {
            if motion::point(ed).line == ed.last_line() {
                let at = motion::point(ed);
                ed.replace_range("\n", at, at);
            }
            motion::jump(ed, Position::new(cursor.line + 1, 0));
            let at = motion::point(ed);
            ed.replace_range(&format!("{output}\n"), at, at);
            motion::end_of_line(ed);
        })
    }

    /// Evaluate the selection (or current line) without printing the result.
    pub fn exec_selection(&self) {
        let result = self
            .current_region()
            .and_then(|region| self.run_command(&region).map(|_| ()));
        if let Err(error) = result {
            self.host.ui.show_message(&error.to_string());
        }
    }

    /// Prompt for a script, record it in history, evaluate it, and show the
    /// result as a message.
    pub async fn prompt_exec(&self) {
        if let Err(error) = self.try_prompt_exec().await {
            self.host.ui.show_message(&error.to_string());
        }
    }

    async fn try_prompt_exec(&self) -> Result<(), Error> {
        let pending = self
            .host
            .ui
            .prompt_string("Execute script (press return to run)");
        let submitted = pending.wait().await.map_err(Error::Collaborator)?;
        let script = submitted
            .into_string()
            .map_err(|t| Error::Collaborator(format!("prompt returned {t}, not a string")))?;
        if let Ok(mut history) = self.history.write() {
            history.add(script.clone());
        }
        let output = self.run_command(&script)?;
        self.host.ui.show_message(&output);
        Ok(())
    }

    /// Read a note from the file store and evaluate it; functions it defines
    /// stay invocable.
    pub fn source(&self, name: &str) -> Result<(), Error> {
        let contents = self.host.files.read(name)?;
        self.refresh_scope();
        self.engine.eval(&contents)?;
        Ok(())
    }

    /// Evaluate a startup script file. A missing file is fine; read or
    /// evaluation failures are reported as messages.
    pub fn load_script_file(&self, path: &Path) {
        if !path.exists() {
            return;
        }
        let result = std::fs::read_to_string(path)
            .map_err(|e| Error::Collaborator(format!("could not read {}: {e}", path.display())))
            .and_then(|script| self.run_command(&script).map(|_| ()));
        if let Err(error) = result {
            self.host
                .ui
                .show_message(&format!("{} failed to load: {error}", path.display()));
        }
    }

    /// One-shot startup hook: source the `repl` note if the store has one.
    pub fn load_init(&mut self) {
        if self.init_loaded {
            return;
        }
        self.init_loaded = true;
        if self.host.files.exists("repl") {
            if let Err(error) = self.source("repl") {
                self.host.ui.show_message(&format!("repl failed to load: {error}"));
            }
        }
    }

    /// Invoke a registered command. Every failure is reported as a message;
    /// nothing escapes to the host's own dispatch, and registry state is
    /// untouched by errors.
    pub fn run_registered(&self, id: &str) {
        let command = self.registry.read().ok().and_then(|reg| reg.get(id).cloned());
        let Some(command) = command else {
            self.host.ui.show_message(&format!("no such command: {id}"));
            return;
        };
        self.refresh_scope();
        tracing::debug!(command = %command.id, "invoking");
        if let Err(error) = self.engine.invoke(&command.id) {
            self.host.ui.show_message(&format!("{} failed: {error}", command.name));
        }
    }
}
