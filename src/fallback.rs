//! Single-date fallback parsing.
//!
//! Anything the resolver's fixed rules don't recognize is handed to a
//! [`SingleDateParser`]. The default implementation wraps `chrono-english`,
//! which understands absolute dates ("10 July 2025", "2024-03-01") and
//! common relative phrases ("next friday", "3 days ago"). Month-first dates
//! ("july 10 2025") and partial dates ("july 2025", "2025-07") that it
//! rejects are handled here.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_english::{Dialect, parse_date_string};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Best-effort natural-language parser for a single calendar date.
pub trait SingleDateParser: Send + Sync {
    /// Parse `text` relative to `reference`, returning `None` when the text
    /// is not a date this parser understands.
    fn parse_single_date(&self, text: &str, reference: NaiveDateTime) -> Option<NaiveDate>;
}

impl<F> SingleDateParser for F
where
    F: Fn(&str, NaiveDateTime) -> Option<NaiveDate> + Send + Sync,
{
    fn parse_single_date(&self, text: &str, reference: NaiveDateTime) -> Option<NaiveDate> {
        self(text, reference)
    }
}

/// Date-order convention for numeric dates like `04/01/17`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateDialect {
    /// Month first (`04/01/17` is April 1st).
    #[default]
    Us,
    /// Day first (`04/01/17` is January 4th).
    Uk,
}

impl DateDialect {
    const fn to_chrono_english(self) -> Dialect {
        match self {
            Self::Us => Dialect::Us,
            Self::Uk => Dialect::Uk,
        }
    }
}

impl std::str::FromStr for DateDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "american" => Ok(Self::Us),
            "uk" | "british" => Ok(Self::Uk),
            _ => Err(format!("Invalid date dialect: {s}")),
        }
    }
}

impl std::fmt::Display for DateDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Us => f.write_str("us"),
            Self::Uk => f.write_str("uk"),
        }
    }
}

/// [`SingleDateParser`] backed by `chrono-english`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishDateParser {
    dialect: DateDialect,
}

impl EnglishDateParser {
    #[must_use]
    pub const fn new(dialect: DateDialect) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub const fn dialect(&self) -> DateDialect {
        self.dialect
    }
}

impl SingleDateParser for EnglishDateParser {
    fn parse_single_date(&self, text: &str, reference: NaiveDateTime) -> Option<NaiveDate> {
        // UTC only carries the naive wall-clock value; no offset is applied.
        let base = Utc.from_utc_datetime(&reference);
        match parse_date_string(text, base, self.dialect.to_chrono_english()) {
            Ok(dt) => Some(dt.date_naive()),
            Err(err) => {
                trace!(input = text, error = %err, "chrono-english rejected input");
                try_parse_month_first(text).or_else(|| try_parse_month_year(text, reference.date()))
            }
        }
    }
}

/// "july 10 2025", "jul 10th, 2025"
fn try_parse_month_first(input: &str) -> Option<NaiveDate> {
    let cleaned = input.replace(',', " ");
    let mut parts = cleaned.split_whitespace();
    let month = parse_month_name(parts.next()?)?;
    let day = parse_day(parts.next()?)?;
    let year = parse_year(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Partial dates ("july 2025", "2025-07") take their day from `today`,
/// clamped to the length of the target month.
fn try_parse_month_year(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = parse_year_month_numeric(input).or_else(|| {
        let mut parts = input.split_whitespace();
        let month = parse_month_name(parts.next()?)?;
        let year = parse_year(parts.next()?)?;
        parts.next().is_none().then_some((year, month))
    })?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    (1..=today.day())
        .rev()
        .find_map(|day| first.with_day(day))
}

fn parse_year_month_numeric(input: &str) -> Option<(i32, u32)> {
    let (year, month) = input.trim().split_once(['-', '/'])?;
    let year = parse_year(year)?;
    let month = month.parse::<u32>().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

fn parse_year(token: &str) -> Option<i32> {
    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn parse_month_name(token: &str) -> Option<u32> {
    match token.trim_end_matches('.') {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

fn parse_day(token: &str) -> Option<u32> {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    digits.parse::<u32>().ok().filter(|day| (1..=31).contains(day))
}
