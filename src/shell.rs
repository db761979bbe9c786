//! Interactive kickstart shell
//!
//! Each line typed at the prompt is parsed as one kickstart command into a
//! single handler. Lines starting with `.` are meta-commands:
//! `.show`, `.clear [command]`, `.help` and `.quit`.

use anyhow::{bail, Context, Error};
use kickstart::{KickstartHandler, Parser, Version};
use log::{debug, warn};
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};

const PROMPT: &str = "ks> ";

const HELP_TEXT: &str = r#"Enter kickstart commands one per line.

Meta-commands:
  .show            Print the kickstart built so far
  .clear           Forget every command entered
  .clear <name>    Reset one command to its defaults
  .help            Show this help
  .quit            Print the kickstart and exit
"#;

/// What the prompt loop should do after a line
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading, printing the text if any
    Continue(Option<String>),
    /// Leave the shell
    Exit,
}

#[derive(Debug)]
pub struct Shell {
    parser: Parser,
}

impl Shell {
    pub fn new(version: Version) -> Self {
        Self {
            parser: Parser::new(KickstartHandler::new(version)),
        }
    }

    pub fn handler(&self) -> &KickstartHandler {
        self.parser.handler()
    }

    /// Seed the shell with an existing kickstart
    pub fn load(&mut self, input: &str) -> Result<(), Error> {
        self.parser
            .read_kickstart(input, true)
            .with_context(|| format!("Failed to load {input}"))
    }

    pub fn process_line(&mut self, line: &str) -> Result<Outcome, Error> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Outcome::Continue(None));
        }

        if let Some(meta) = trimmed.strip_prefix('.') {
            return self.meta_command(meta);
        }

        if trimmed.starts_with('%') {
            bail!("Sections cannot be entered in the shell");
        }

        let known_warnings = self.parser.warnings().len();
        self.parser.read_kickstart_from_string(trimmed, false)?;

        let warnings = self.parser.warnings()[known_warnings..]
            .iter()
            .map(|w| format!("warning: {}", w.error))
            .collect::<Vec<_>>();
        Ok(Outcome::Continue(
            (!warnings.is_empty()).then(|| warnings.join("\n")),
        ))
    }

    fn meta_command(&mut self, meta: &str) -> Result<Outcome, Error> {
        let mut words = meta.split_whitespace();
        let name = words.next().unwrap_or_default();
        let argument = words.next();
        if words.next().is_some() {
            bail!("Too many arguments to .{name}");
        }

        match (name, argument) {
            ("quit" | "exit", None) => Ok(Outcome::Exit),
            ("help", None) => Ok(Outcome::Continue(Some(HELP_TEXT.into()))),
            ("show", None) => Ok(Outcome::Continue(Some(self.handler().to_string()))),
            ("clear", None) => {
                self.parser.reset();
                Ok(Outcome::Continue(None))
            }
            ("clear", Some(command)) => {
                if !self.parser.handler_mut().reset_command(command) {
                    bail!("Unknown command: {command}");
                }
                Ok(Outcome::Continue(None))
            }
            _ => bail!("Unknown meta-command: .{meta}"),
        }
    }
}

/// Run the prompt until `.quit` or end of input, then print the kickstart
pub fn run(version: Version, input: Option<&str>) -> Result<(), Error> {
    let mut shell = Shell::new(version);
    if let Some(input) = input {
        shell.load(input)?;
    }

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;

    println!("Kickstart shell for {version}");
    println!("Type .help for commands, .quit to exit.");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    warn!("Failed to add history entry: {e}");
                }

                match shell.process_line(&line) {
                    Ok(Outcome::Continue(Some(output))) => println!("{output}"),
                    Ok(Outcome::Continue(None)) => {}
                    Ok(Outcome::Exit) => break,
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                debug!("Interrupted");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => bail!("Failed to read input: {e}"),
        }
    }

    print!("{}", shell.handler());
    Ok(())
}

#[cfg(test)]
mod tests {
    use kickstart::commands::{clearpart::ClearPart, KickstartCommand};

    use super::*;

    fn output(outcome: Outcome) -> Option<String> {
        match outcome {
            Outcome::Continue(text) => text,
            Outcome::Exit => panic!("Unexpected exit"),
        }
    }

    #[test]
    fn test_commands_accumulate() {
        let mut shell = Shell::new(Version::F34);
        assert_eq!(output(shell.process_line("skipx").unwrap()), None);
        assert_eq!(output(shell.process_line("  ").unwrap()), None);
        shell.process_line("zerombr").unwrap();

        let shown = output(shell.process_line(".show").unwrap()).unwrap();
        assert!(shown.starts_with("#version=F34\n"));
        assert!(shown.contains("skipx\n"));
        assert!(shown.contains("zerombr\n"));
    }

    #[test]
    fn test_clear() {
        let mut shell = Shell::new(Version::F34);
        shell.process_line("clearpart --all").unwrap();
        shell.process_line("skipx").unwrap();

        shell.process_line(".clear clearpart").unwrap();
        assert!(!shell.handler().command::<ClearPart>().unwrap().seen());
        assert!(shell.handler().to_string().contains("skipx"));

        shell.process_line(".clear").unwrap();
        assert_eq!(shell.handler().to_string(), "#version=F34\n");

        assert!(shell.process_line(".clear no-such-command").is_err());
    }

    #[test]
    fn test_rejected_lines() {
        let mut shell = Shell::new(Version::F34);
        assert!(shell.process_line("%packages").is_err());
        assert!(shell.process_line("bogus-command").is_err());
        assert!(shell.process_line(".frobnicate").is_err());
        assert!(shell.process_line(".show extra").is_err());

        // The shell keeps working after an error
        shell.process_line("skipx").unwrap();
        assert!(shell.handler().to_string().contains("skipx"));
    }

    #[test]
    fn test_warnings_reported() {
        let mut shell = Shell::new(Version::F8);
        let text = output(shell.process_line("mouse").unwrap()).unwrap();
        assert!(text.starts_with("warning: "), "{text}");
        assert!(text.contains("mouse"));
        assert_eq!(output(shell.process_line("skipx").unwrap()), None);
    }

    #[test]
    fn test_quit() {
        let mut shell = Shell::new(Version::F34);
        assert_eq!(shell.process_line(".quit").unwrap(), Outcome::Exit);
    }
}
