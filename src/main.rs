//! Line-oriented demo REPL over the scripting core. Edits an in-memory
//! scratch buffer, sources notes from `~/.config/wren/notes`, and keeps
//! submitted scripts in `~/.config/wren/history.json`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing_subscriber::EnvFilter;

use wren::Session;
use wren::editor::ScratchBuffer;
use wren::history::History;
use wren::host::{
    ConsoleUi, DirStore, Host, MemoryClipboard, SystemRunner, SystemUrlOpener,
};

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wren")
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = config_dir();
    let history_path = config.join("history.json");

    let host = Host {
        files: Arc::new(DirStore::new(config.join("notes"))),
        ui: Arc::new(ConsoleUi),
        runner: Arc::new(SystemRunner),
        clipboard: Arc::new(MemoryClipboard::default()),
        urls: Arc::new(SystemUrlOpener),
    };

    let buffer = Arc::new(RwLock::new(ScratchBuffer::new()));
    let mut session = Session::new(host);
    session.activate(buffer.clone(), Some("scratch".to_string()));
    session.load_script_file(&config.join("init.rhai"));
    session.load_init();

    if let Ok(loaded) = History::load(&history_path) {
        if let Ok(mut history) = session.history().write() {
            *history = loaded;
        }
    }

    println!("wren scripting repl -- :quit leaves, :buffer prints the scratch buffer");
    let stdin = io::stdin();
    loop {
        print!("wren> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let script = line.trim();

        match script {
            "" => continue,
            ":quit" | ":q" => break,
            ":buffer" => {
                if let Ok(buf) = buffer.read() {
                    println!("{}", buf.contents());
                }
                continue;
            }
            _ => {}
        }

        if let Ok(mut history) = session.history().write() {
            history.add(script);
        }
        match session.run_command(script) {
            Ok(output) => println!("{output}"),
            Err(error) => eprintln!("error: {error}"),
        }

        // Let just-settled pendings reach the reserved bindings before the
        // next prompt.
        tokio::task::yield_now().await;
    }

    std::fs::create_dir_all(&config)?;
    if let Ok(history) = session.history().read() {
        history.save(&history_path)?;
    }
    Ok(())
}
