//! Data models for resolved time expressions.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TimeframeError};

/// An inclusive calendar date range.
///
/// Construction enforces `start <= end`, so every value handed out by the
/// resolver is well ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from two dates.
    ///
    /// # Errors
    ///
    /// Returns [`TimeframeError::InvalidRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(TimeframeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day of the range (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both ends.
    #[must_use]
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Check whether a date falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Start and end as a tuple.
    #[must_use]
    pub const fn as_tuple(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// A calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Map a quarter designator (`q1`, `1st`, `first`, ...) to a quarter.
    #[must_use]
    pub fn from_designator(token: &str) -> Option<Self> {
        match token {
            "1st" | "first" | "q1" => Some(Self::Q1),
            "2nd" | "second" | "q2" => Some(Self::Q2),
            "3rd" | "third" | "q3" => Some(Self::Q3),
            "4th" | "fourth" | "q4" => Some(Self::Q4),
            _ => None,
        }
    }

    /// First and last month of the quarter (1-based).
    #[must_use]
    pub const fn months(self) -> (u32, u32) {
        match self {
            Self::Q1 => (1, 3),
            Self::Q2 => (4, 6),
            Self::Q3 => (7, 9),
            Self::Q4 => (10, 12),
        }
    }

    /// Full date range of this quarter in `year`.
    ///
    /// Returns `None` if the year is outside chrono's representable range.
    #[must_use]
    pub fn range_in(self, year: i32) -> Option<DateRange> {
        let (first_month, last_month) = self.months();
        let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
        let following = if last_month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, last_month + 1, 1)?
        };
        let end = following - Duration::days(1);
        Some(DateRange { start, end })
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

/// The rule that produced a resolved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Quarter,
    Yesterday,
    Today,
    LastWeek,
    ThisWeek,
    LastMonth,
    ThisMonth,
    /// Delegated to the single-date parser.
    Fallback,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quarter => "quarter",
            Self::Yesterday => "yesterday",
            Self::Today => "today",
            Self::LastWeek => "last_week",
            Self::ThisWeek => "this_week",
            Self::LastMonth => "last_month",
            Self::ThisMonth => "this_month",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful resolution: the normalized input, the rule that matched and
/// the resulting range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub expression: String,
    pub rule: Rule,
    pub range: DateRange,
}
