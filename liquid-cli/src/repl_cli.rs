use colored::Colorize;
use liquid_cli::{Error, Liquid, diagnostics};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use std::io::IsTerminal;

const HISTORY_FILE: &str = ".liquid_history";
const SOURCE_ID: &str = "<repl>";

pub struct ReplCli {
    editor: Editor<(), rustyline::history::DefaultHistory>,
    liquid: Liquid,
    last_failed: bool,
}

impl ReplCli {
    pub fn new(liquid: Liquid) -> Result<Self, Box<dyn std::error::Error>> {
        let mut editor = Editor::<(), rustyline::history::DefaultHistory>::new()?;
        let _ = editor.load_history(HISTORY_FILE);
        Ok(Self {
            editor,
            liquid,
            last_failed: false,
        })
    }

    pub fn run(mut self) -> Result<(), ReadlineError> {
        if std::io::stdin().is_terminal() {
            println!("Liquid v{}", env!("CARGO_PKG_VERSION"));
            println!("Type \\? for help or \\q to exit");
            println!();
        }

        loop {
            match self.editor.readline(&self.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line)?;

                    if let Some(command) = line.strip_prefix('\\') {
                        if !self.handle_command(command) {
                            break;
                        }
                    } else {
                        self.evaluate(line);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "(Use \\q to quit)".bright_black());
                }
                Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("Error: {}", error);
                    break;
                }
            }
        }

        self.editor.save_history(HISTORY_FILE)?;
        Ok(())
    }

    fn prompt(&self) -> String {
        let prompt = if self.last_failed {
            "λ>".red()
        } else {
            "λ>".white()
        };
        format!("{} ", prompt.bold())
    }

    fn handle_command(&mut self, command: &str) -> bool {
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));
        match name {
            "?" => {
                println!("{}", "Available commands:".bright_black());
                println!("{}", "  \\? - Show this help message".bright_black());
                println!("{}", "  \\q - Exit the REPL".bright_black());
                println!("{}", "  \\t <program> - Show the type of a program".bright_black());
                println!("{}", "  \\c <program> - Show the compiled core term".bright_black());
            }
            "q" => return false,
            "t" => match self.liquid.check(rest) {
                Ok(ty) => println!("{}", ty.to_string().cyan()),
                Err(e) => self.print_error(&e, rest),
            },
            "c" => match self.liquid.compile(rest) {
                Ok((term, _)) => println!("{}", term),
                Err(e) => self.print_error(&e, rest),
            },
            _ => eprintln!("{}", format!("Unknown command: \\{}", command).red()),
        }
        true
    }

    fn evaluate(&mut self, line: &str) {
        match self.liquid.evaluate(line) {
            Ok((value, ty)) => {
                self.last_failed = false;
                println!("{} {} {}", value, ":".bright_black(), ty.to_string().cyan());
            }
            Err(e) => {
                self.last_failed = true;
                self.print_error(&e, line);
            }
        }
    }

    fn print_error(&self, error: &Error, source: &str) {
        match error {
            Error::ParseError(e) => diagnostics::eprint_syntax(e, SOURCE_ID, source),
            Error::TypeError(e) => diagnostics::eprint_type(e, SOURCE_ID, source),
            Error::RuntimeError(e) => eprintln!("{}", e.to_string().red()),
        }
    }
}
