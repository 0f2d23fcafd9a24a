//! Interactive REPL for timeframe.
//!
//! Every line that isn't a command is resolved as a time expression and
//! printed as a range or an error, then the prompt returns.

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, EditMode, Editor};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::error::format_resolve_error;
use crate::fallback::SingleDateParser;
use crate::resolver::Resolver;

/// REPL session state.
pub struct ReplSession<P> {
    resolver: Resolver<P>,
    format: OutputFormat,
    resolved: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Resolve { expression: String },
    Format { format: Option<OutputFormat> },
    Help,
    Quit,
}

/// Run the REPL session.
///
/// # Errors
///
/// Returns an error if readline setup or history persistence fails.
pub fn run<P: SingleDateParser>(resolver: Resolver<P>, format: OutputFormat) -> Result<()> {
    let config = Config::builder()
        .history_ignore_space(true)
        .history_ignore_dups(true)?
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".timeframe_history");
    let _ = rl.load_history(&history_path);

    let mut session = ReplSession::new(resolver, format);

    info!("Starting timeframe REPL session");
    println!(
        "{}",
        "Enter a time expression (e.g. 'last week', 'Q1 2023', 'yesterday', 'third quarter of 2024')."
            .cyan()
    );
    println!("{}", "Type 'help' for commands, 'quit' to exit.".dimmed());
    println!();

    loop {
        let prompt = session.format_prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if !matches!(line, "quit" | "exit" | "q") {
                    rl.add_history_entry(line)?;
                }

                debug!(command = %line, "REPL input");
                if !session.execute(line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(e)).context("Readline failed");
            }
        }
    }

    rl.save_history(&history_path)
        .with_context(|| format!("Failed to save history to {}", history_path.display()))?;
    info!(resolved = session.resolved, "Ended timeframe REPL session");
    println!("Goodbye!");
    Ok(())
}

impl<P: SingleDateParser> ReplSession<P> {
    const fn new(resolver: Resolver<P>, format: OutputFormat) -> Self {
        Self {
            resolver,
            format,
            resolved: 0,
        }
    }

    fn format_prompt(&self) -> String {
        if self.resolved == 0 {
            "timeframe> ".to_string()
        } else {
            format!("timeframe [{}]> ", self.resolved)
        }
    }

    /// Handle one line of input. Returns `false` when the session should end.
    fn execute(&mut self, input: &str) -> bool {
        match parse_command(input) {
            Command::Resolve { expression } => {
                match self.resolver.resolve_detailed(&expression) {
                    Ok(resolution) => {
                        self.resolved += 1;
                        println!("{}", crate::format_resolution(&resolution, self.format));
                    }
                    Err(e) => eprintln!("{}", format_resolve_error(&e)),
                }
            }
            Command::Format { format: Some(format) } => {
                self.format = format;
                println!("Output format set to {format:?}");
            }
            Command::Format { format: None } => {
                eprintln!(
                    "{}: expected one of text, json, json-pretty, compact",
                    "Error".red()
                );
            }
            Command::Help => print_help(),
            Command::Quit => return false,
        }
        true
    }
}

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    match parts.next() {
        Some("help" | "h" | "?") if parts.next().is_none() => Command::Help,
        Some("quit" | "exit" | "q") if parts.next().is_none() => Command::Quit,
        Some(":format") => Command::Format {
            format: parts.next().and_then(|f| f.parse().ok()),
        },
        _ => Command::Resolve {
            expression: input.to_string(),
        },
    }
}

fn print_help() {
    println!("{}", "Commands:".bold().cyan());
    println!("  <expression>      - resolve a time expression to a date range");
    println!("  :format <format>  - switch output (text, json, json-pretty, compact)");
    println!("  help              - show this help");
    println!("  quit              - exit");
    println!();
    println!("{}", "Examples:".bold().cyan());
    println!("  last week | this month | yesterday | Q4 2024 | first quarter of 2023 | 10 July 2025");
}
