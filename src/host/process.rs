//! Synchronous external process execution.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::Error;

/// Runs a program and captures its stdout, blocking the calling thread for
/// the duration of the process.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<String, Error>;
}

pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, argv: &[String], stdin: Option<&str>) -> Result<String, Error> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Collaborator("empty command".to_string()))?;
        let mut command = Command::new(program);
        command.args(args).stdout(Stdio::piped()).stderr(Stdio::inherit());

        let output = match stdin {
            None => {
                command.stdin(Stdio::null());
                command.output()
            }
            Some(input) => {
                command.stdin(Stdio::piped());
                command.spawn().and_then(|mut child| {
                    if let Some(mut pipe) = child.stdin.take() {
                        pipe.write_all(input.as_bytes())?;
                    }
                    child.wait_with_output()
                })
            }
        }
        .map_err(|e| Error::Collaborator(format!("failed to run {program}: {e}")))?;

        if !output.status.success() {
            return Err(Error::Collaborator(format!(
                "{program} exited with {}",
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Split a command line into argv, honoring single and double quotes and
/// backslash escapes.
pub fn split_command(line: &str) -> Result<Vec<String>, Error> {
    let mut argv = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                } else if c == '\\' && q == '"' {
                    match chars.next() {
                        Some(escaped) => current.push(escaped),
                        None => {
                            return Err(Error::Collaborator(
                                "trailing backslash in command".to_string(),
                            ));
                        }
                    }
                } else {
                    current.push(c);
                }
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => match chars.next() {
                    Some(escaped) => {
                        current.push(escaped);
                        in_word = true;
                    }
                    None => {
                        return Err(Error::Collaborator(
                            "trailing backslash in command".to_string(),
                        ));
                    }
                },
                c if c.is_whitespace() => {
                    if in_word {
                        argv.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err(Error::Collaborator("unterminated quote in command".to_string()));
    }
    if in_word {
        argv.push(current);
    }
    Ok(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(split_command("echo hello world").unwrap(), ["echo", "hello", "world"]);
    }

    #[test]
    fn quotes_preserve_spaces() {
        assert_eq!(
            split_command(r#"grep "two words" 'a b'"#).unwrap(),
            ["grep", "two words", "a b"]
        );
    }

    #[test]
    fn empty_quoted_argument_survives() {
        assert_eq!(split_command(r#"prog """#).unwrap(), ["prog", ""]);
    }

    #[test]
    fn backslash_escapes_in_double_quotes() {
        assert_eq!(split_command(r#"echo "a\"b""#).unwrap(), ["echo", "a\"b"]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        assert!(matches!(
            split_command("echo 'oops"),
            Err(Error::Collaborator(_))
        ));
    }

    #[test]
    fn runner_captures_stdout() {
        let runner = SystemRunner;
        let argv = split_command("echo hello").unwrap();
        assert_eq!(runner.run(&argv, None).unwrap(), "hello\n");
    }

    #[test]
    fn runner_pipes_stdin() {
        let runner = SystemRunner;
        let argv = vec!["cat".to_string()];
        assert_eq!(runner.run(&argv, Some("piped in")).unwrap(), "piped in");
    }

    #[test]
    fn nonzero_exit_is_an_error() {
        let runner = SystemRunner;
        let argv = vec!["false".to_string()];
        assert!(matches!(runner.run(&argv, None), Err(Error::Collaborator(_))));
    }
}
