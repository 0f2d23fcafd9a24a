//! timeframe - natural-language time expressions to date ranges
//!
//! Resolves phrases like "last week", "Q1 2024" or "yesterday" into an
//! inclusive pair of calendar dates relative to today.
//!
//! ```no_run
//! let range = timeframe::resolve("Q1 2024").unwrap();
//! assert_eq!(range.to_string(), "2024-01-01 to 2024-03-31");
//! ```
//!
//! # Modules
//!
//! - [`resolver`] - Ordered rule evaluation producing a [`DateRange`]
//! - [`fallback`] - Pluggable single-date parser (`chrono-english` by default)
//! - [`model`] - Date ranges, quarters and resolution results
//! - [`error`] - Error types and CLI error formatting
//! - [`config`] - Layered configuration (file, env, CLI)
//! - [`cli`] - Command-line interface definitions
//! - [`repl`] - Interactive prompt

pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod model;
pub mod repl;
pub mod resolver;

pub use cli::{Cli, Commands, OutputFormat};
pub use error::{
    KNOWN_PHRASES, Result, ResultExt, TimeframeError, UNPARSEABLE_GUIDANCE, closest_phrase,
    format_resolve_error,
};
pub use fallback::{DateDialect, EnglishDateParser, SingleDateParser};
pub use model::{DateRange, Quarter, Resolution, Rule};
pub use resolver::{Resolver, resolve};

use colored::Colorize;
use serde::Serialize;

/// Date format used for all rendered output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
struct ResolutionJson<'a> {
    expression: &'a str,
    rule: Rule,
    start: String,
    end: String,
    days: i64,
}

/// Render a resolution in the requested output format.
#[must_use]
pub fn format_resolution(resolution: &Resolution, format: OutputFormat) -> String {
    let start = resolution.range.start().format(DATE_FORMAT).to_string();
    let end = resolution.range.end().format(DATE_FORMAT).to_string();

    match format {
        OutputFormat::Text => format!(
            "{} Start Date: {}\n{} End Date:   {}",
            "✓".green(),
            start.bold(),
            "✓".green(),
            end.bold()
        ),
        OutputFormat::Compact => format!("{start} {end}"),
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let json = ResolutionJson {
                expression: &resolution.expression,
                rule: resolution.rule,
                start,
                end,
                days: resolution.range.num_days(),
            };
            let rendered = if format == OutputFormat::JsonPretty {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            };
            // Plain strings and integers always serialize.
            rendered.unwrap_or_default()
        }
    }
}

/// Render a failed expression as a JSON object (used by `batch`).
#[must_use]
pub fn format_failure_json(expression: &str, err: &TimeframeError) -> String {
    serde_json::json!({
        "expression": expression,
        "error": err.to_string(),
    })
    .to_string()
}
