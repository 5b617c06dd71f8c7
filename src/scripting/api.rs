//! Capability modules injected into every evaluation. Each module follows
//! the same shape: native closures over shared handles, reading the current
//! editor/app state at call time so scripts always see the live buffer.

use std::sync::{Arc, RwLock};

use rhai::{Array, Dynamic, EvalAltResult, FnPtr, Module, NativeCallContext, Scope};

use super::engine::Library;
use super::pending::Pending;
use super::scope::Bindings;
use crate::command::CommandRegistry;
use crate::editor::{EditorSlot, Position, data, motion, regexp};
use crate::error::Error;
use crate::history::History;
use crate::host::{Clipboard, FileStore, ProcessRunner, Ui, UrlOpener, split_command};

/// Collected `name -- doc` lines, one per capability, served by the
/// `functions()` listing.
#[derive(Clone, Default)]
pub struct Docs {
    inner: Arc<RwLock<Vec<String>>>,
}

impl Docs {
    pub fn add(&self, name: &str, doc: &str) {
        let entry = format!("{name} -- {doc}");
        if let Ok(mut docs) = self.inner.write() {
            if !docs.contains(&entry) {
                docs.push(entry);
            }
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.inner.read().map(|docs| docs.clone()).unwrap_or_default()
    }
}

fn host_err(err: Error) -> Box<EvalAltResult> {
    err.to_string().into()
}

/// Buffer motion, data extraction, and regexp motion.
pub fn editor_module(slot: EditorSlot, docs: &Docs) -> Module {
    let mut module = Module::new();

    docs.add("point", "Return the current cursor position");
    {
        let s = slot.clone();
        module.set_native_fn("point", move || s.with(|ed| motion::point(ed)).map_err(host_err));
    }

    docs.add("mark", "Return the position at the start of the current selection");
    {
        let s = slot.clone();
        module.set_native_fn("mark", move || s.with(|ed| motion::mark(ed)).map_err(host_err));
    }

    docs.add("point_min", "Return the position at the start of the buffer");
    module.set_native_fn("point_min", || Ok(motion::point_min()));

    docs.add("point_max", "Return the position at the end of the buffer");
    {
        let s = slot.clone();
        module.set_native_fn("point_max", move || {
            s.with(|ed| motion::point_max(ed)).map_err(host_err)
        });
    }

    docs.add("jump", "(p: Position) Jump to the given position");
    {
        let s = slot.clone();
        module.set_native_fn("jump", move |p: Position| {
            s.with(|ed| motion::jump(ed, p)).map_err(host_err)
        });
    }

    docs.add("jump_line", "(line: int) Jump to the start of the given line");
    {
        let s = slot.clone();
        module.set_native_fn("jump_line", move |line: i64| {
            s.with(|ed| motion::jump_line(ed, line.max(0) as usize))
                .map_err(host_err)
        });
    }

    docs.add("forward_char", "(count?: int) Move count (or 1) characters forward");
    {
        let s = slot.clone();
        module.set_native_fn("forward_char", move || {
            s.with(|ed| motion::forward_char(ed, 1)).map_err(host_err)
        });
    }
    {
        let s = slot.clone();
        module.set_native_fn("forward_char", move |count: i64| {
            s.with(|ed| motion::forward_char(ed, count.max(0) as usize))
                .map_err(host_err)
        });
    }

    docs.add("line_number", "Return the current line number");
    {
        let s = slot.clone();
        module.set_native_fn("line_number", move || {
            s.with(|ed| motion::line_number(ed) as i64).map_err(host_err)
        });
    }

    docs.add("end_of_line", "Go to the end of the current line");
    {
        let s = slot.clone();
        module.set_native_fn("end_of_line", move || {
            s.with(|ed| motion::end_of_line(ed)).map_err(host_err)
        });
    }

    docs.add("end_of_line_point", "Return the position at the end of the current line");
    {
        let s = slot.clone();
        module.set_native_fn("end_of_line_point", move || {
            s.with(|ed| motion::end_of_line_point(ed)).map_err(host_err)
        });
    }

    docs.add("at_end_of_buffer", "Return true if the cursor is at the end of the buffer");
    {
        let s = slot.clone();
        module.set_native_fn("at_end_of_buffer", move || {
            s.with(|ed| motion::at_end_of_buffer(ed)).map_err(host_err)
        });
    }

    docs.add(
        "buffer_string",
        "Return the buffer content, or the text between two positions",
    );
    {
        let s = slot.clone();
        module.set_native_fn("buffer_string", move || {
            s.with(|ed| data::buffer_string(ed, None, None)).map_err(host_err)
        });
    }
    {
        let s = slot.clone();
        module.set_native_fn("buffer_string", move |a: Position, b: Position| {
            s.with(|ed| data::buffer_string(ed, Some(a), Some(b)))
                .map_err(host_err)
        });
    }

    docs.add("rest_of_line", "Return the text from the cursor to the end of the line");
    {
        let s = slot.clone();
        module.set_native_fn("rest_of_line", move || {
            s.with(|ed| data::rest_of_line(ed)).map_err(host_err)
        });
    }

    docs.add("line_at_point", "Return the content of the line the cursor is on");
    {
        let s = slot.clone();
        module.set_native_fn("line_at_point", move || {
            s.with(|ed| data::line_at_point(ed)).map_err(host_err)
        });
    }

    docs.add("selection", "Return the text of the selection");
    {
        let s = slot.clone();
        module.set_native_fn("selection", move || {
            s.with(|ed| data::selection_text(ed)).map_err(host_err)
        });
    }

    docs.add("word_at_point", "Return the word the cursor is on");
    {
        let s = slot.clone();
        module.set_native_fn("word_at_point", move || {
            s.with(|ed| data::word_at_point(ed))
                .and_then(|r| r)
                .map_err(host_err)
        });
    }

    docs.add("insert", "(s: string) Insert a string at the current point");
    {
        let s = slot.clone();
        module.set_native_fn("insert", move |text: &str| {
            s.with(|ed| data::insert(ed, text)).map_err(host_err)
        });
    }

    docs.add("kill", "(start?: Position, end?: Position) Delete the region, defaulting to the selection");
    {
        let s = slot.clone();
        module.set_native_fn("kill", move || {
            s.with(|ed| data::kill(ed, None, None)).map_err(host_err)
        });
    }
    {
        let s = slot.clone();
        module.set_native_fn("kill", move |a: Position, b: Position| {
            s.with(|ed| data::kill(ed, Some(a), Some(b))).map_err(host_err)
        });
    }

    docs.add("at_regexp", "(pattern: string) Does the rest of the line match here?");
    {
        let s = slot.clone();
        module.set_native_fn("at_regexp", move |pattern: &str| {
            let re = regexp::anchored(pattern).map_err(host_err)?;
            s.with(|ed| regexp::at_regexp(ed, &re)).map_err(host_err)
        });
    }

    docs.add(
        "forward_regexp",
        "(pattern: string) Move to the next match, or stay put and return false",
    );
    {
        let s = slot.clone();
        module.set_native_fn("forward_regexp", move |pattern: &str| {
            let re = regexp::anchored(pattern).map_err(host_err)?;
            s.with(|ed| regexp::forward_regexp(ed, &re)).map_err(host_err)
        });
    }

    module
}

/// Note-store access by logical title.
pub fn file_module(files: Arc<dyn FileStore>, docs: &Docs) -> Module {
    let mut module = Module::new();

    docs.add("read_file", "(title: string) Read the note with the given title");
    {
        let f = files.clone();
        module.set_native_fn("read_file", move |name: &str| f.read(name).map_err(host_err));
    }

    docs.add("write_file", "(title: string, text: string) Replace the note's contents");
    {
        let f = files.clone();
        module.set_native_fn("write_file", move |name: &str, text: &str| {
            f.write(name, text).map_err(host_err)
        });
    }

    docs.add("append_to_file", "(title: string, text: string) Append to the note");
    {
        let f = files.clone();
        module.set_native_fn("append_to_file", move |name: &str, text: &str| {
            f.append(name, text).map_err(host_err)
        });
    }

    docs.add("rename_file", "(from: string, to: string) Rename a note");
    {
        let f = files.clone();
        module.set_native_fn("rename_file", move |from: &str, to: &str| {
            f.rename(from, to).map_err(host_err)
        });
    }

    module
}

/// Prompts, messages, and popups.
pub fn ui_module(ui: Arc<dyn Ui>, docs: &Docs) -> Module {
    let mut module = Module::new();

    docs.add("message", "(msg: string) Show a notification message");
    {
        let u = ui.clone();
        module.set_native_fn("message", move |text: &str| {
            u.show_message(text);
            Ok(())
        });
    }

    docs.add("popup", "(msg: string) Open a popup; settles when dismissed");
    {
        let u = ui.clone();
        module.set_native_fn("popup", move |text: &str| Ok(u.show_popup(text)));
    }

    docs.add("prompt_string", "(label: string) Read a string from the user");
    {
        let u = ui.clone();
        module.set_native_fn("prompt_string", move |label: &str| Ok(u.prompt_string(label)));
    }

    docs.add("select_from_list", "(choices: array, label?: string) Pick one of the choices");
    {
        let u = ui.clone();
        module.set_native_fn("select_from_list", move |choices: Array| {
            let choices: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
            Ok(u.select_from_list(choices, "Select"))
        });
    }
    {
        let u = ui.clone();
        module.set_native_fn("select_from_list", move |choices: Array, label: &str| {
            let choices: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
            Ok(u.select_from_list(choices, label))
        });
    }

    module
}

/// Process execution, clipboard, and URL opening.
pub fn process_module(
    runner: Arc<dyn ProcessRunner>,
    clipboard: Arc<dyn Clipboard>,
    urls: Arc<dyn UrlOpener>,
    docs: &Docs,
) -> Module {
    let mut module = Module::new();

    docs.add("run", "(command: string|array, stdin?: string) Run a program, return its stdout");
    {
        let r = runner.clone();
        module.set_native_fn("run", move |command: &str| {
            let argv = split_command(command).map_err(host_err)?;
            r.run(&argv, None).map_err(host_err)
        });
    }
    {
        let r = runner.clone();
        module.set_native_fn("run", move |command: &str, stdin: &str| {
            let argv = split_command(command).map_err(host_err)?;
            r.run(&argv, Some(stdin)).map_err(host_err)
        });
    }
    {
        let r = runner.clone();
        module.set_native_fn("run", move |argv: Array| {
            let argv: Vec<String> = argv.iter().map(|a| a.to_string()).collect();
            r.run(&argv, None).map_err(host_err)
        });
    }

    docs.add("clipboard_get", "Return the contents of the clipboard");
    {
        let c = clipboard.clone();
        module.set_native_fn("clipboard_get", move || c.get().map_err(host_err));
    }

    docs.add("clipboard_put", "(s: string) Put a string on the clipboard");
    {
        let c = clipboard.clone();
        module.set_native_fn("clipboard_put", move |text: &str| {
            c.put(text).map_err(host_err)
        });
    }

    docs.add("open_url", "(url: string) Open the url in a browser");
    {
        let u = urls.clone();
        module.set_native_fn("open_url", move |url: &str| u.open(url).map_err(host_err));
    }

    module
}

/// Session-level capabilities: command registration, sourcing notes,
/// persistent bindings, history, and the capability listing itself.
pub fn session_module(
    registry: Arc<RwLock<CommandRegistry>>,
    library: Library,
    files: Arc<dyn FileStore>,
    bindings: Bindings,
    history: Arc<RwLock<History>>,
    ui: Arc<dyn Ui>,
    docs: &Docs,
) -> Module {
    let mut module = Module::new();

    docs.add(
        "new_command",
        "(f: FnPtr) Register a function named like_this as the command \"like this\"",
    );
    {
        let reg = registry.clone();
        module.set_native_fn("new_command", move |f: FnPtr| {
            if let Ok(mut reg) = reg.write() {
                reg.register(f.fn_name());
            }
            Ok(f)
        });
    }

    docs.add("source", "(title: string) Load the note with the given title and evaluate it");
    {
        let f = files.clone();
        let lib = library.clone();
        module.set_native_fn(
            "source",
            move |ctx: NativeCallContext, name: &str| -> Result<(), Box<EvalAltResult>> {
                let contents = f.read(name).map_err(host_err)?;
                let ast = ctx
                    .engine()
                    .compile(&contents)
                    .map_err(|e| host_err(Error::from(e)))?;
                let mut scope = Scope::new();
                ctx.engine().eval_ast_with_scope::<Dynamic>(&mut scope, &ast)?;
                lib.absorb(&ast);
                Ok(())
            },
        );
    }

    docs.add("bind", "(name: string, value) Install a binding visible to later scripts");
    {
        let b = bindings.clone();
        module.set_native_fn("bind", move |name: &str, value: Dynamic| {
            b.set(name, value);
            Ok(())
        });
    }

    docs.add("history_entries", "Return the submitted-script history, oldest first");
    {
        let h = history.clone();
        module.set_native_fn("history_entries", move || -> Result<Array, Box<EvalAltResult>> {
            Ok(h.read()
                .map(|h| h.entries().iter().cloned().map(Dynamic::from).collect())
                .unwrap_or_default())
        });
    }

    docs.add("commands", "Return the ids of all registered commands");
    {
        let reg = registry.clone();
        module.set_native_fn("commands", move || -> Result<Array, Box<EvalAltResult>> {
            Ok(reg
                .read()
                .map(|reg| reg.ids().into_iter().map(Dynamic::from).collect())
                .unwrap_or_default())
        });
    }

    docs.add("functions", "Browse the capabilities available to scripts");
    {
        let d = docs.clone();
        let u = ui.clone();
        module.set_native_fn("functions", move || {
            Ok(u.select_from_list(d.entries(), "Functions"))
        });
    }

    module
}
