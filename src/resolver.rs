//! Natural-language time expression resolution.
//!
//! Turns phrases like "last week", "Q1 2024" or "yesterday" into an
//! inclusive [`DateRange`]. Rules are tried in a fixed order and the first
//! match wins:
//!
//! 1. Quarter designators anchored at the start ("q3 2024", "first quarter of 2023")
//! 2. Exact keywords "yesterday" and "today"
//! 3. Substrings "last week", "this week", "last month", "this month"
//! 4. A single-date fallback parser, producing a one-day range
//!
//! Weeks start on Monday.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, TimeframeError};
use crate::fallback::{EnglishDateParser, SingleDateParser};
use crate::model::{DateRange, Quarter, Resolution, Rule};

static QUARTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(1st|first|2nd|second|3rd|third|4th|fourth|q1|q2|q3|q4)\s*(quarter)?\s*(of|in)?\s*([0-9]{4})",
    )
    .expect("quarter pattern is valid")
});

/// Resolves time expressions against the current wall clock.
#[derive(Debug, Clone, Default)]
pub struct Resolver<P = EnglishDateParser> {
    fallback: P,
}

impl Resolver<EnglishDateParser> {
    /// Resolver using the `chrono-english` fallback with US date order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: SingleDateParser> Resolver<P> {
    /// Resolver with a custom single-date fallback.
    pub const fn with_fallback(fallback: P) -> Self {
        Self { fallback }
    }

    #[must_use]
    pub const fn fallback(&self) -> &P {
        &self.fallback
    }

    /// Resolve an expression relative to the local date right now.
    ///
    /// # Errors
    /// Returns [`TimeframeError::UnparseableExpression`] if no rule matches
    /// and the fallback parser finds no date.
    pub fn resolve(&self, expression: &str) -> Result<DateRange> {
        self.resolve_detailed(expression).map(|r| r.range)
    }

    /// Like [`resolve`](Self::resolve) but also reports which rule matched.
    ///
    /// # Errors
    /// Returns [`TimeframeError::UnparseableExpression`] if nothing matches.
    pub fn resolve_detailed(&self, expression: &str) -> Result<Resolution> {
        self.resolve_at(expression, Local::now().naive_local())
    }

    /// Resolve an expression relative to a fixed reference instant.
    ///
    /// # Errors
    /// Returns [`TimeframeError::UnparseableExpression`] if nothing matches.
    pub fn resolve_at(&self, expression: &str, reference: NaiveDateTime) -> Result<Resolution> {
        let normalized = expression.trim().to_lowercase();
        let today = reference.date();

        if let Some(range) = try_parse_quarter(&normalized) {
            debug!(input = %normalized, "Resolved quarter range");
            return Ok(resolution(normalized, Rule::Quarter, range));
        }

        if let Some((rule, range)) = try_parse_keyword(&normalized, today) {
            debug!(input = %normalized, rule = %rule, "Resolved keyword range");
            return Ok(resolution(normalized, rule, range));
        }

        if let Some(date) = self.fallback.parse_single_date(&normalized, reference) {
            debug!(input = %normalized, %date, "Resolved via single-date fallback");
            return Ok(resolution(normalized, Rule::Fallback, DateRange::single_day(date)));
        }

        debug!(input = %normalized, "No rule matched time expression");
        Err(TimeframeError::unparseable(normalized))
    }
}

/// Resolve an expression with the default resolver.
///
/// # Errors
/// Returns [`TimeframeError::UnparseableExpression`] if nothing matches.
pub fn resolve(expression: &str) -> Result<DateRange> {
    Resolver::new().resolve(expression)
}

fn resolution(expression: String, rule: Rule, range: DateRange) -> Resolution {
    Resolution {
        expression,
        rule,
        range,
    }
}

fn try_parse_quarter(input: &str) -> Option<DateRange> {
    let caps = QUARTER_RE.captures(input)?;
    let quarter = Quarter::from_designator(caps.get(1)?.as_str())?;
    let year = caps.get(4)?.as_str().parse::<i32>().ok()?;
    debug!(%quarter, year, "Matched quarter designator");
    quarter.range_in(year)
}

fn try_parse_keyword(input: &str, today: NaiveDate) -> Option<(Rule, DateRange)> {
    match input {
        "yesterday" => {
            let date = today.pred_opt()?;
            return Some((Rule::Yesterday, DateRange::single_day(date)));
        }
        "today" => return Some((Rule::Today, DateRange::single_day(today))),
        _ => {}
    }

    if input.contains("last week") {
        let start = week_start(today)?.checked_sub_signed(Duration::days(7))?;
        return week_from(start).map(|r| (Rule::LastWeek, r));
    }
    if input.contains("this week") {
        return week_from(week_start(today)?).map(|r| (Rule::ThisWeek, r));
    }
    if input.contains("last month") {
        return previous_month_range(today).map(|r| (Rule::LastMonth, r));
    }
    if input.contains("this month") {
        return current_month_range(today).map(|r| (Rule::ThisMonth, r));
    }
    None
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_monday())))
}

fn week_from(monday: NaiveDate) -> Option<DateRange> {
    let sunday = monday.checked_add_signed(Duration::days(6))?;
    DateRange::new(monday, sunday).ok()
}

fn previous_month_range(today: NaiveDate) -> Option<DateRange> {
    let first_current = today.with_day(1)?;
    let last_prev = first_current.pred_opt()?;
    let first_prev = last_prev.with_day(1)?;
    DateRange::new(first_prev, last_prev).ok()
}

fn current_month_range(today: NaiveDate) -> Option<DateRange> {
    let start = today.with_day(1)?;
    // Day 28 exists in every month; four days later is always next month.
    let next_month = start
        .with_day(28)?
        .checked_add_signed(Duration::days(4))?
        .with_day(1)?;
    let end = next_month.pred_opt()?;
    DateRange::new(start, end).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    fn no_fallback(_: &str, _: NaiveDateTime) -> Option<NaiveDate> {
        None
    }

    fn resolver() -> Resolver<fn(&str, NaiveDateTime) -> Option<NaiveDate>> {
        Resolver::with_fallback(no_fallback as fn(&str, NaiveDateTime) -> Option<NaiveDate>)
    }

    fn resolve_at(input: &str, reference: NaiveDateTime) -> (NaiveDate, NaiveDate) {
        resolver()
            .resolve_at(input, reference)
            .expect("expression resolves")
            .range
            .as_tuple()
    }

    #[test]
    fn quarter_synonyms_resolve_identically() {
        let reference = at(2025, 6, 11);
        let groups = [
            ["q1", "1st", "first"],
            ["q2", "2nd", "second"],
            ["q3", "3rd", "third"],
            ["q4", "4th", "fourth"],
        ];
        for group in groups {
            let expected = resolve_at(&format!("{} 2023", group[0]), reference);
            for token in group {
                assert_eq!(resolve_at(&format!("{token} 2023"), reference), expected);
                assert_eq!(
                    resolve_at(&format!("{token} quarter of 2023"), reference),
                    expected
                );
                assert_eq!(
                    resolve_at(&format!("{token} quarter in 2023"), reference),
                    expected
                );
            }
        }
    }

    #[test]
    fn quarter_ranges() {
        let reference = at(2025, 6, 11);
        assert_eq!(resolve_at("Q4 2024", reference), (date(2024, 10, 1), date(2024, 12, 31)));
        assert_eq!(resolve_at("Q1 2024", reference), (date(2024, 1, 1), date(2024, 3, 31)));
        assert_eq!(
            resolve_at("second quarter 2022", reference),
            (date(2022, 4, 1), date(2022, 6, 30))
        );
        assert_eq!(
            resolve_at("3rd quarter of 2021", reference),
            (date(2021, 7, 1), date(2021, 9, 30))
        );
    }

    #[test]
    fn quarter_without_spaces_matches() {
        assert_eq!(
            resolve_at("q22024", at(2025, 6, 11)),
            (date(2024, 4, 1), date(2024, 6, 30))
        );
    }

    #[test]
    fn quarter_ignores_trailing_text_and_takes_priority() {
        let reference = at(2025, 6, 11);
        let resolved = resolver()
            .resolve_at("q1 2024 compared to last week", reference)
            .unwrap();
        assert_eq!(resolved.rule, Rule::Quarter);
        assert_eq!(resolved.range.as_tuple(), (date(2024, 1, 1), date(2024, 3, 31)));
    }

    #[test]
    fn quarter_must_be_anchored_at_start() {
        let err = resolver().resolve_at("sales q1 2024", at(2025, 6, 11)).unwrap_err();
        assert!(matches!(err, TimeframeError::UnparseableExpression { .. }));
    }

    #[test]
    fn quarter_year_must_be_ascii_digits() {
        let err = resolver().resolve_at("q1 \u{662}\u{660}\u{662}\u{664}", at(2025, 6, 11)).unwrap_err();
        assert!(matches!(err, TimeframeError::UnparseableExpression { .. }));
    }

    #[test]
    fn extreme_reference_dates_fail_without_panicking() {
        let min = NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap();
        let max = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap();
        for input in ["yesterday", "last week", "last month"] {
            assert!(resolver().resolve_at(input, min).is_err(), "{input}");
        }
        for input in ["this week", "this month"] {
            assert!(resolver().resolve_at(input, max).is_err(), "{input}");
        }
    }

    #[test]
    fn default_resolver_uses_us_english_fallback() {
        use crate::fallback::DateDialect;
        assert_eq!(Resolver::new().fallback().dialect(), DateDialect::Us);
        let uk = Resolver::with_fallback(EnglishDateParser::new(DateDialect::Uk));
        assert_eq!(uk.fallback().dialect(), DateDialect::Uk);
    }

    #[test]
    fn quarter_requires_year() {
        assert!(resolver().resolve_at("q1", at(2025, 6, 11)).is_err());
    }

    #[test]
    fn yesterday_and_today() {
        assert_eq!(
            resolve_at("yesterday", at(2025, 6, 15)),
            (date(2025, 6, 14), date(2025, 6, 14))
        );
        assert_eq!(
            resolve_at("today", at(2025, 6, 15)),
            (date(2025, 6, 15), date(2025, 6, 15))
        );
        assert_eq!(
            resolve_at("yesterday", at(2025, 1, 1)),
            (date(2024, 12, 31), date(2024, 12, 31))
        );
    }

    #[test]
    fn keywords_are_normalized() {
        assert_eq!(
            resolve_at("  YesterDay \n", at(2025, 6, 15)),
            (date(2025, 6, 14), date(2025, 6, 14))
        );
    }

    #[test]
    fn yesterday_must_match_exactly() {
        assert!(resolver().resolve_at("since yesterday", at(2025, 6, 15)).is_err());
    }

    #[test]
    fn last_week_from_wednesday() {
        assert_eq!(
            resolve_at("last week", at(2025, 6, 11)),
            (date(2025, 5, 26), date(2025, 6, 1))
        );
    }

    #[test]
    fn last_week_from_monday_and_sunday() {
        assert_eq!(
            resolve_at("last week", at(2025, 6, 9)),
            (date(2025, 6, 2), date(2025, 6, 8))
        );
        assert_eq!(
            resolve_at("last week", at(2025, 6, 15)),
            (date(2025, 6, 2), date(2025, 6, 8))
        );
    }

    #[test]
    fn this_week_spans_monday_to_sunday() {
        assert_eq!(
            resolve_at("this week", at(2025, 6, 11)),
            (date(2025, 6, 9), date(2025, 6, 15))
        );
        assert_eq!(
            resolve_at("sales this week please", at(2025, 1, 1)),
            (date(2024, 12, 30), date(2025, 1, 5))
        );
    }

    #[test]
    fn last_month_rolls_over_year() {
        assert_eq!(
            resolve_at("last month", at(2025, 1, 20)),
            (date(2024, 12, 1), date(2024, 12, 31))
        );
        assert_eq!(
            resolve_at("last month", at(2024, 3, 31)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
    }

    #[test]
    fn this_month_handles_month_lengths() {
        assert_eq!(
            resolve_at("this month", at(2024, 2, 10)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            resolve_at("this month", at(2023, 2, 10)),
            (date(2023, 2, 1), date(2023, 2, 28))
        );
        assert_eq!(
            resolve_at("this month", at(2025, 4, 30)),
            (date(2025, 4, 1), date(2025, 4, 30))
        );
        assert_eq!(
            resolve_at("this month", at(2025, 12, 31)),
            (date(2025, 12, 1), date(2025, 12, 31))
        );
    }

    #[test]
    fn substring_rules_follow_source_order() {
        let resolved = resolver()
            .resolve_at("this month or last week", at(2025, 6, 11))
            .unwrap();
        assert_eq!(resolved.rule, Rule::LastWeek);
    }

    #[test]
    fn fallback_produces_single_day() {
        let fixed = date(2025, 7, 10);
        let resolver = Resolver::with_fallback(move |text: &str, _: NaiveDateTime| {
            (text == "10 july 2025").then_some(fixed)
        });
        let resolved = resolver.resolve_at("10 July 2025", at(2025, 6, 11)).unwrap();
        assert_eq!(resolved.rule, Rule::Fallback);
        assert_eq!(resolved.range.as_tuple(), (fixed, fixed));
    }

    #[test]
    fn fallback_receives_reference_instant() {
        let reference = at(2025, 6, 11);
        let resolver =
            Resolver::with_fallback(|_: &str, base: NaiveDateTime| Some(base.date() + Duration::days(2)));
        let resolved = resolver.resolve_at("friday", reference).unwrap();
        assert_eq!(resolved.range.start(), date(2025, 6, 13));
    }

    #[test]
    fn fallback_is_not_consulted_when_a_rule_matches() {
        let resolver = Resolver::with_fallback(|_: &str, _: NaiveDateTime| -> Option<NaiveDate> {
            panic!("fallback should not run")
        });
        assert!(resolver.resolve_at("today", at(2025, 6, 11)).is_ok());
    }

    #[test]
    fn total_failure_carries_guidance() {
        let err = resolver()
            .resolve_at("not a real date at all", at(2025, 6, 11))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("last week"));
        assert!(message.contains("Q1 2024"));
        assert!(message.contains("10 July 2025"));
    }

    #[test]
    fn empty_input_falls_through_to_failure() {
        assert!(resolver().resolve_at("   ", at(2025, 6, 11)).is_err());
    }

    #[test]
    fn resolution_is_idempotent_for_fixed_instant() {
        let reference = at(2025, 6, 11);
        for input in ["last week", "this month", "q3 2020", "yesterday"] {
            assert_eq!(
                resolver().resolve_at(input, reference).unwrap(),
                resolver().resolve_at(input, reference).unwrap()
            );
        }
    }

    #[test]
    fn resolution_reports_normalized_expression() {
        let resolved = resolver().resolve_at("  LAST Month ", at(2025, 6, 11)).unwrap();
        assert_eq!(resolved.expression, "last month");
        assert_eq!(resolved.rule, Rule::LastMonth);
    }
}
