//! UI prompt contracts. Prompts resolve asynchronously through [`Pending`]
//! values so modal hosts can settle them whenever the user finishes.

use std::io::{self, BufRead, Write};

use rhai::Dynamic;

use crate::scripting::Pending;

pub trait Ui: Send + Sync {
    /// Read a string from the user; settles when submitted.
    fn prompt_string(&self, label: &str) -> Pending;

    /// Let the user pick one of `choices`; settles with the chosen entry.
    fn select_from_list(&self, choices: Vec<String>, label: &str) -> Pending;

    /// Fire-and-forget notification.
    fn show_message(&self, text: &str);

    /// Show a larger message; settles when dismissed.
    fn show_popup(&self, text: &str) -> Pending;
}

/// Line-oriented UI for the demo binary: prompts block on stdin, messages go
/// to stdout.
pub struct ConsoleUi;

impl ConsoleUi {
    fn read_line(label: &str) -> io::Result<String> {
        print!("{label}: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

impl Ui for ConsoleUi {
    fn prompt_string(&self, label: &str) -> Pending {
        let (pending, settler) = Pending::channel(format!("prompt: {label}"));
        match Self::read_line(label) {
            Ok(line) => settler.resolve(Dynamic::from(line)),
            Err(e) => settler.reject(format!("prompt failed: {e}")),
        }
        pending
    }

    fn select_from_list(&self, choices: Vec<String>, label: &str) -> Pending {
        let (pending, settler) = Pending::channel(format!("select: {label}"));
        println!("{label}:");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}. {choice}", i + 1);
        }
        match Self::read_line("number") {
            Ok(line) => match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= choices.len() => {
                    settler.resolve(Dynamic::from(choices[n - 1].clone()));
                }
                _ => settler.reject("selection cancelled"),
            },
            Err(e) => settler.reject(format!("selection failed: {e}")),
        }
        pending
    }

    fn show_message(&self, text: &str) {
        println!("-- {text}");
    }

    fn show_popup(&self, text: &str) -> Pending {
        println!("{text}");
        Pending::resolved(Dynamic::UNIT)
    }
}
