//! CLI definitions for timeframe.
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::fallback::DateDialect;

/// timeframe - turn phrases like "last week" into date ranges
#[derive(Parser, Debug)]
#[command(name = "timeframe")]
#[command(version)]
#[command(about = "Resolve natural-language time expressions into date ranges")]
#[command(long_about = r#"
timeframe - resolve natural-language time expressions into concrete,
inclusive date ranges relative to today.

Recognized expressions:
  - Quarters: "Q1 2024", "third quarter of 2023", "2nd quarter in 2022"
  - Keywords: "yesterday", "today"
  - Weeks (Monday start): "last week", "this week"
  - Months: "last month", "this month"
  - Single dates: "10 July 2025", "2024-03-01", "next friday"

Quick start:
  timeframe resolve last week
  timeframe resolve "Q1 2024" --format json
  timeframe repl
"#)]
pub struct Cli {
    /// Output format [default: text, or TIMEFRAME_FORMAT / config]
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Date order for numeric dates (us: MM/DD, uk: DD/MM) [default: us, or TIMEFRAME_DIALECT / config]
    #[arg(long, global = true, ignore_case = true)]
    pub dialect: Option<DialectArg>,

    /// Path to a config file (defaults to the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Be verbose (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Be quiet (suppress non-error output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a single time expression
    Resolve(ResolveArgs),

    /// Resolve one expression per line from a file or stdin
    Batch(BatchArgs),

    /// Interactive mode: type expressions, get ranges
    Repl,

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// The expression; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub expression: Vec<String>,
}

impl ResolveArgs {
    /// The expression as the user typed it.
    #[must_use]
    pub fn joined(&self) -> String {
        self.expression.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one expression per line (stdin if omitted or "-")
    pub input: Option<PathBuf>,

    /// Stop at the first expression that fails to resolve
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show the effective configuration
    #[arg(long)]
    pub show: bool,

    /// Write a default config file to the user config path
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| format!("Invalid output format: {s}"))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialectArg {
    #[value(alias = "american")]
    Us,
    #[value(alias = "british")]
    Uk,
}

impl From<DialectArg> for DateDialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Us => Self::Us,
            DialectArg::Uk => Self::Uk,
        }
    }
}
