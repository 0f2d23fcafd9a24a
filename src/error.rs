//! Error types for timeframe.
//!
//! Library functions return [`TimeframeError`]; the binary wraps it in
//! `anyhow` at the edge. Resolution failures always display the same
//! guidance text so callers can show it verbatim.

use chrono::NaiveDate;
use colored::Colorize;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

/// Guidance shown whenever an expression cannot be resolved.
pub const UNPARSEABLE_GUIDANCE: &str = "Could not parse the time expression. Try expressions like 'last week', 'Q1 2024', or '10 July 2025'.";

/// Keyword phrases the resolver recognizes, used for typo hints.
pub const KNOWN_PHRASES: &[&str] = &[
    "yesterday",
    "today",
    "last week",
    "this week",
    "last month",
    "this month",
];

/// Primary error type for timeframe operations.
#[derive(Error, Debug)]
pub enum TimeframeError {
    /// No rule matched and the fallback parser found no date.
    #[error("{}", UNPARSEABLE_GUIDANCE)]
    UnparseableExpression { expression: String },

    /// A range whose start falls after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Failed to {operation} '{path}': {source}")]
    PathError {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigError { path: PathBuf, reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type alias for timeframe operations.
pub type Result<T> = std::result::Result<T, TimeframeError>;

impl TimeframeError {
    pub fn unparseable(expression: impl Into<String>) -> Self {
        Self::UnparseableExpression {
            expression: expression.into(),
        }
    }

    pub fn config_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn path_error(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::PathError {
            operation,
            path: path.into(),
            source,
        }
    }

    /// The normalized expression that failed to resolve, if any.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::UnparseableExpression { expression } => Some(expression),
            _ => None,
        }
    }

    /// Whether the user can fix this by changing their input or config.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnparseableExpression { .. }
                | Self::ConfigError { .. }
                | Self::InvalidArgument { .. }
        )
    }

    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnparseableExpression { .. } => Some(
                "Use a quarter ('third quarter of 2024'), a keyword ('yesterday', 'this month') or a date ('2025-07-10').",
            ),
            Self::ConfigError { .. } => {
                Some("Run 'timeframe config --init --force' to write a fresh default config.")
            }
            _ => None,
        }
    }
}

/// Attach a message to any standard error, producing [`TimeframeError::WithContext`].
pub trait ResultExt<T> {
    /// # Errors
    ///
    /// Returns the original error wrapped with `context`.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TimeframeError::WithContext {
            context: context.into(),
            source: Box::new(e),
        })
    }
}

// =============================================================================
// Terminal rendering
// =============================================================================

/// Edit distance between two strings, counted in chars.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }

    row[b.len()]
}

/// The known phrase closest to `input`, if it is a near miss (1-2 edits).
#[must_use]
pub fn closest_phrase(input: &str) -> Option<&'static str> {
    KNOWN_PHRASES
        .iter()
        .map(|&phrase| (phrase, edit_distance(input, phrase)))
        .filter(|&(_, distance)| (1..=2).contains(&distance))
        .min_by_key(|&(_, distance)| distance)
        .map(|(phrase, _)| phrase)
}

/// Render an error for stderr: a headline, the error message, and any hints.
#[must_use]
pub fn format_resolve_error(err: &TimeframeError) -> String {
    let headline = err.expression().map_or_else(
        || "Resolution failed".to_string(),
        |expr| format!("Unrecognized expression: '{expr}'"),
    );
    let mut output = format!("{} {}\n\n   {err}", "✗".red().bold(), headline.bold());

    if let Some(phrase) = err.expression().and_then(closest_phrase) {
        let _ = write!(output, "\n\n   Did you mean '{}'?", phrase.green());
    }
    if let Some(hint) = err.suggestion() {
        let _ = write!(output, "\n   {} {hint}", "Hint:".cyan());
    }

    output
}
