//! Supplier deadline arithmetic and deadline detection in free text

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::dates::{expand_short_year, month_from_name, parse_date, DateOrder};

/// Default days between the supplier deadline and the client deadline
pub const DEFAULT_BUFFER_DAYS: i64 = 2;

/// How a matched date pattern maps its three capture groups
#[derive(Debug, Clone, Copy)]
enum DateShape {
    DayMonthYear,
    DayMonthShortYear,
    YearMonthDay,
    MonthNameDayYear,
    DayMonthNameYear,
}

static DATE_PATTERNS: Lazy<Vec<(Regex, DateShape)>> = Lazy::new(|| {
    [
        (r"(\d{1,2})[/.-](\d{1,2})[/.-](\d{4})", DateShape::DayMonthYear),
        (r"(\d{1,2})[/.-](\d{1,2})[/.-](\d{2})", DateShape::DayMonthShortYear),
        (r"(\d{4})[/.-](\d{1,2})[/.-](\d{1,2})", DateShape::YearMonthDay),
        (r"(?i)(\w+)\s+(\d{1,2}),?\s+(\d{4})", DateShape::MonthNameDayYear),
        (r"(?i)(\d{1,2})\s+(\w+)\s+(\d{4})", DateShape::DayMonthNameYear),
        // ordinal suffixes: December 15th, 2024
        (r"(?i)(\w+)\s+(\d{1,2})\w{0,2},?\s+(\d{4})", DateShape::MonthNameDayYear),
    ]
    .into_iter()
    .map(|(pattern, shape)| {
        (
            Regex::new(pattern).expect("Should compile: DATE_PATTERNS"),
            shape,
        )
    })
    .collect()
});

static DEADLINE_CONTEXTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"deadline\s*:?\s*",
        r"due\s*(?:by|on|date)?\s*:?\s*",
        r"submit\s*(?:by|before|on)?\s*:?\s*",
        r"closing\s*(?:date|time)?\s*:?\s*",
        r"no\s*later\s*than\s*:?\s*",
        r"final\s*(?:date|deadline)\s*:?\s*",
        r"tender\s*(?:deadline|due)\s*:?\s*",
        r"proposal\s*(?:deadline|due)\s*:?\s*",
        r"quotation\s*(?:deadline|due)\s*:?\s*",
    ]
    .into_iter()
    .map(|pattern| {
        Regex::new(&format!("(?i){}", pattern)).expect("Should compile: DEADLINE_CONTEXTS")
    })
    .collect()
});

/// Bytes searched before a context phrase
const WINDOW_BEFORE: usize = 50;
/// Bytes searched after a context phrase
const WINDOW_AFTER: usize = 100;

/// Where a deadline stands relative to today
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineState {
    Overdue,
    DueToday,
    DueSoon,
    Approaching,
    OnTrack,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

/// Status report for one deadline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeadlineStatus {
    pub status: DeadlineState,
    pub urgency: Urgency,
    pub days_remaining: i64,
    pub is_business_day: bool,
    pub deadline_date: NaiveDate,
}

/// Supplier deadline calculator
#[derive(Debug, Clone)]
pub struct DeadlineCalculator {
    buffer_days: i64,
}

impl Default for DeadlineCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_DAYS)
    }
}

impl DeadlineCalculator {
    /// Create a calculator with the given buffer
    pub fn new(buffer_days: i64) -> Self {
        Self { buffer_days }
    }

    pub fn buffer_days(&self) -> i64 {
        self.buffer_days
    }

    /// Client deadline minus the buffer, never earlier than `today`;
    /// `None` when the buffer leaves the supported date range
    pub fn calculate_supplier_deadline(&self, client_deadline: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
        subtract_days(client_deadline, self.buffer_days).map(|deadline| deadline.max(today))
    }

    /// Same as [`calculate_supplier_deadline`](Self::calculate_supplier_deadline)
    /// for a textual client deadline; `None` when the text is not a date
    pub fn calculate_from_str(&self, client_deadline: &str, today: NaiveDate) -> Option<NaiveDate> {
        Self::parse_date_string(client_deadline)
            .and_then(|client| self.calculate_supplier_deadline(client, today))
    }

    /// Parse a user-entered date, reading ambiguous numeric dates day-first
    pub fn parse_date_string(input: &str) -> Option<NaiveDate> {
        parse_date(input, DateOrder::DayFirst)
    }

    /// Find the deadline in free text.
    ///
    /// Dates near a deadline phrase win over dates anywhere else, and only
    /// dates on or after `today` count.
    pub fn extract_deadline_from_text(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        if text.trim().is_empty() {
            return None;
        }

        for context in DEADLINE_CONTEXTS.iter() {
            for m in context.find_iter(text) {
                let start = floor_boundary(text, m.start().saturating_sub(WINDOW_BEFORE));
                let end = ceil_boundary(text, m.end() + WINDOW_AFTER);
                if let Some(found) = find_date(&text[start..end], today) {
                    tracing::debug!("Deadline {} found near '{}'", found, m.as_str().trim());
                    return Some(found);
                }
            }
        }

        find_date(text, today)
    }

    /// Monday through Friday
    pub fn is_business_day(date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// First business day strictly after `from`
    pub fn next_business_day(from: NaiveDate) -> Option<NaiveDate> {
        let mut day = from.succ_opt()?;
        while !Self::is_business_day(day) {
            day = day.succ_opt()?;
        }
        Some(day)
    }

    /// Last business day strictly before `from`
    pub fn previous_business_day(from: NaiveDate) -> Option<NaiveDate> {
        let mut day = from.pred_opt()?;
        while !Self::is_business_day(day) {
            day = day.pred_opt()?;
        }
        Some(day)
    }

    /// Business days in the inclusive range, in either order
    pub fn business_days_between(a: NaiveDate, b: NaiveDate) -> u32 {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| Self::is_business_day(*day))
            .count() as u32
    }

    /// Supplier deadline scaled by project complexity (1.0 is normal), moved
    /// off weekends and never earlier than the next business day when late.
    /// `None` when the scaled buffer leaves the supported date range.
    pub fn suggest_optimal_supplier_deadline(
        &self,
        client_deadline: NaiveDate,
        complexity_factor: f64,
        today: NaiveDate,
    ) -> Option<NaiveDate> {
        let scaled = (self.buffer_days as f64 * complexity_factor).trunc();
        if !scaled.is_finite() || scaled >= i64::MAX as f64 {
            return None;
        }
        let buffer = (scaled as i64).max(1);

        let mut deadline = subtract_days(client_deadline, buffer)?;
        if !Self::is_business_day(deadline) {
            deadline = Self::previous_business_day(deadline)?;
        }
        if deadline < today {
            deadline = Self::next_business_day(today)?;
        }
        Some(deadline)
    }

    /// Classify a deadline relative to `today`
    pub fn deadline_status(&self, deadline: NaiveDate, today: NaiveDate) -> DeadlineStatus {
        let days_remaining = (deadline - today).num_days();

        let (status, urgency) = match days_remaining {
            d if d < 0 => (DeadlineState::Overdue, Urgency::Critical),
            0 => (DeadlineState::DueToday, Urgency::Critical),
            1 => (DeadlineState::DueSoon, Urgency::High),
            2 | 3 => (DeadlineState::Approaching, Urgency::Medium),
            _ => (DeadlineState::OnTrack, Urgency::Low),
        };

        DeadlineStatus {
            status,
            urgency,
            days_remaining,
            is_business_day: Self::is_business_day(deadline),
            deadline_date: deadline,
        }
    }
}

fn subtract_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_sub_signed(TimeDelta::try_days(days)?)
}

/// First date in `text` that is not in the past, trying each pattern in turn
fn find_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    DATE_PATTERNS.iter().find_map(|(regex, shape)| {
        regex
            .captures_iter(text)
            .filter_map(|caps| date_from_captures(&caps, *shape))
            .find(|date| *date >= today)
    })
}

fn date_from_captures(caps: &Captures<'_>, shape: DateShape) -> Option<NaiveDate> {
    let number = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
    let year = |i: usize| caps.get(i)?.as_str().parse::<i32>().ok();
    let month_name = |i: usize| month_from_name(caps.get(i)?.as_str());

    match shape {
        DateShape::DayMonthYear => NaiveDate::from_ymd_opt(year(3)?, number(2)?, number(1)?),
        DateShape::DayMonthShortYear => {
            NaiveDate::from_ymd_opt(expand_short_year(year(3)?), number(2)?, number(1)?)
        }
        DateShape::YearMonthDay => NaiveDate::from_ymd_opt(year(1)?, number(2)?, number(3)?),
        DateShape::MonthNameDayYear => NaiveDate::from_ymd_opt(year(3)?, month_name(1)?, number(2)?),
        DateShape::DayMonthNameYear => NaiveDate::from_ymd_opt(year(3)?, month_name(2)?, number(1)?),
    }
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // A Wednesday
    fn today() -> NaiveDate {
        ymd(2025, 1, 8)
    }

    #[test]
    fn test_supplier_deadline_subtracts_buffer() {
        let calc = DeadlineCalculator::default();
        assert_eq!(calc.calculate_supplier_deadline(ymd(2025, 1, 20), today()), Some(ymd(2025, 1, 18)));
    }

    #[test]
    fn test_supplier_deadline_clamps_to_today() {
        let calc = DeadlineCalculator::new(5);
        assert_eq!(calc.calculate_supplier_deadline(ymd(2025, 1, 10), today()), Some(today()));
        assert_eq!(calc.calculate_supplier_deadline(ymd(2024, 12, 1), today()), Some(today()));
    }

    #[test]
    fn test_supplier_deadline_from_text_input() {
        let calc = DeadlineCalculator::default();
        assert_eq!(calc.calculate_from_str("20/01/2025", today()), Some(ymd(2025, 1, 18)));
        assert_eq!(calc.calculate_from_str("January 20, 2025", today()), Some(ymd(2025, 1, 18)));
        assert_eq!(calc.calculate_from_str("next friday", today()), None);
    }

    #[test]
    fn test_extract_prefers_context_window() {
        let calc = DeadlineCalculator::default();
        let text = "Issued 01/02/2025 for review.\n\
                    Lots of unrelated text about scope and drawings goes here to pad things out a good deal further.\n\
                    Submission deadline: 15/03/2025 at noon.";
        assert_eq!(calc.extract_deadline_from_text(text, today()), Some(ymd(2025, 3, 15)));
    }

    #[test]
    fn test_extract_skips_past_dates() {
        let calc = DeadlineCalculator::default();
        let text = "Closing date: 01/12/2024 (extended) to 20/01/2025";
        assert_eq!(calc.extract_deadline_from_text(text, today()), Some(ymd(2025, 1, 20)));
        assert_eq!(calc.extract_deadline_from_text("Deadline: 01/12/2024", today()), None);
    }

    #[test]
    fn test_extract_month_names_and_ordinals() {
        let calc = DeadlineCalculator::default();
        assert_eq!(
            calc.extract_deadline_from_text("Quotation due: February 3rd, 2025", today()),
            Some(ymd(2025, 2, 3))
        );
        assert_eq!(
            calc.extract_deadline_from_text("Bids accepted until 14 March 2025", today()),
            Some(ymd(2025, 3, 14))
        );
        assert_eq!(calc.extract_deadline_from_text("", today()), None);
    }

    #[test]
    fn test_extract_without_context_searches_whole_text() {
        let calc = DeadlineCalculator::default();
        assert_eq!(
            calc.extract_deadline_from_text("Meeting on 2025/02/10 in Cairo", today()),
            Some(ymd(2025, 2, 10))
        );
    }

    #[test]
    fn test_business_days() {
        let friday = ymd(2025, 1, 10);
        let saturday = ymd(2025, 1, 11);
        let monday = ymd(2025, 1, 13);

        assert!(DeadlineCalculator::is_business_day(friday));
        assert!(!DeadlineCalculator::is_business_day(saturday));
        assert_eq!(DeadlineCalculator::next_business_day(friday), Some(monday));
        assert_eq!(DeadlineCalculator::previous_business_day(monday), Some(friday));
        assert_eq!(DeadlineCalculator::business_days_between(today(), monday), 4);
        assert_eq!(DeadlineCalculator::business_days_between(monday, today()), 4);
        assert_eq!(DeadlineCalculator::business_days_between(saturday, saturday), 0);
    }

    #[test]
    fn test_suggest_moves_weekend_back() {
        let calc = DeadlineCalculator::default();
        // Monday minus 2 lands on Saturday, so Friday is suggested
        assert_eq!(
            calc.suggest_optimal_supplier_deadline(ymd(2025, 1, 20), 1.0, today()),
            Some(ymd(2025, 1, 17))
        );
        // complexity 2.0 doubles the buffer
        assert_eq!(
            calc.suggest_optimal_supplier_deadline(ymd(2025, 1, 24), 2.0, today()),
            Some(ymd(2025, 1, 20))
        );
        // buffer never drops below a day
        assert_eq!(
            calc.suggest_optimal_supplier_deadline(ymd(2025, 1, 24), 0.1, today()),
            Some(ymd(2025, 1, 23))
        );
    }

    #[test]
    fn test_suggest_late_deadline_uses_next_business_day() {
        let calc = DeadlineCalculator::default();
        assert_eq!(
            calc.suggest_optimal_supplier_deadline(ymd(2025, 1, 9), 1.0, today()),
            Some(ymd(2025, 1, 9))
        );
    }

    #[test]
    fn test_out_of_range_buffers_are_rejected() {
        let huge = DeadlineCalculator::new(i64::MAX);
        assert_eq!(huge.calculate_supplier_deadline(ymd(2031, 1, 20), today()), None);
        assert_eq!(huge.calculate_from_str("20/01/2031", today()), None);

        let calc = DeadlineCalculator::default();
        assert_eq!(calc.suggest_optimal_supplier_deadline(ymd(2031, 1, 20), 1e300, today()), None);
        assert_eq!(
            DeadlineCalculator::new(1).calculate_supplier_deadline(NaiveDate::MIN, NaiveDate::MIN),
            None
        );
        assert_eq!(DeadlineCalculator::next_business_day(NaiveDate::MAX), None);
    }

    #[test]
    fn test_deadline_status_bands() {
        let calc = DeadlineCalculator::default();
        let status = |d| calc.deadline_status(d, today());

        assert_eq!(status(ymd(2025, 1, 7)).status, DeadlineState::Overdue);
        assert_eq!(status(today()).urgency, Urgency::Critical);
        assert_eq!(status(ymd(2025, 1, 9)).status, DeadlineState::DueSoon);
        assert_eq!(status(ymd(2025, 1, 11)).status, DeadlineState::Approaching);
        assert!(!status(ymd(2025, 1, 11)).is_business_day);

        let far = status(ymd(2025, 2, 1));
        assert_eq!(far.status, DeadlineState::OnTrack);
        assert_eq!(far.urgency, Urgency::Low);
        assert_eq!(far.days_remaining, 24);
    }
}
