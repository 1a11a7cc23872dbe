//! Lenient date parsing shared by the extractor and the deadline calculator

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,4})([/.-])(\d{1,2})([/.-])(\d{1,4})$")
        .expect("Should compile: NUMERIC_DATE")
});

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})$").expect("Should compile: MONTH_DAY_YEAR")
});

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\s+([A-Za-z]+)\.?,?\s+(\d{4})$").expect("Should compile: DAY_MONTH_YEAR")
});

/// Which component comes first in an ambiguous numeric date like `03/04/2025`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// `03/04/2025` is March 4th; day-first is the fallback
    MonthFirst,
    /// `03/04/2025` is April 3rd; month-first is the fallback
    DayFirst,
}

/// Month number for a full or abbreviated English month name
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Expand a two digit year: `00..=50` is this century, `51..=99` the last
pub fn expand_short_year(year: i32) -> i32 {
    if year <= 50 {
        2000 + year
    } else {
        1900 + year
    }
}

/// Parse a date written in any of the common tender formats.
///
/// Numeric dates accept `/`, `-` or `.` as the separator (used
/// consistently), a four digit year first (`2025-01-15`) or last, and a two
/// digit trailing year. Month name forms accept `January 15, 2025`,
/// `Jan 15 2025` and `15 January 2025`.
pub fn parse_date(input: &str, order: DateOrder) -> Option<NaiveDate> {
    let input = input.trim();

    if let Some(caps) = NUMERIC_DATE.captures(input) {
        if caps[2] != caps[4] {
            return None;
        }
        let (first, third) = (&caps[1], &caps[5]);
        let second: u32 = caps[3].parse().ok()?;

        if first.len() == 4 {
            let year: i32 = first.parse().ok()?;
            let day: u32 = third.parse().ok()?;
            return if third.len() <= 2 {
                NaiveDate::from_ymd_opt(year, second, day)
            } else {
                None
            };
        }

        if first.len() > 2 {
            return None;
        }
        let first: u32 = first.parse().ok()?;
        let year: i32 = match third.len() {
            4 => third.parse().ok()?,
            2 => expand_short_year(third.parse().ok()?),
            _ => return None,
        };

        let (preferred, fallback) = match order {
            DateOrder::MonthFirst => ((first, second), (second, first)),
            DateOrder::DayFirst => ((second, first), (first, second)),
        };
        return NaiveDate::from_ymd_opt(year, preferred.0, preferred.1)
            .or_else(|| NaiveDate::from_ymd_opt(year, fallback.0, fallback.1));
    }

    if let Some(caps) = MONTH_DAY_YEAR.captures(input) {
        let month = month_from_name(&caps[1])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?);
    }

    if let Some(caps) = DAY_MONTH_YEAR.captures(input) {
        let month = month_from_name(&caps[2])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ambiguous_numeric_dates_follow_order() {
        assert_eq!(parse_date("03/04/2025", DateOrder::MonthFirst), Some(ymd(2025, 3, 4)));
        assert_eq!(parse_date("03/04/2025", DateOrder::DayFirst), Some(ymd(2025, 4, 3)));
    }

    #[test]
    fn test_falls_back_when_preferred_order_is_invalid() {
        assert_eq!(parse_date("25/12/2024", DateOrder::MonthFirst), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_date("12/25/2024", DateOrder::DayFirst), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_date("31/31/2024", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_separators_and_iso() {
        assert_eq!(parse_date("15.01.2025", DateOrder::DayFirst), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("2025-01-15", DateOrder::MonthFirst), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("2025/01/15", DateOrder::DayFirst), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("15/01-2025", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_short_years_pivot() {
        assert_eq!(parse_date("15/01/25", DateOrder::DayFirst), Some(ymd(2025, 1, 15)));
        assert_eq!(parse_date("15/01/50", DateOrder::DayFirst), Some(ymd(2050, 1, 15)));
        assert_eq!(parse_date("15/01/99", DateOrder::DayFirst), Some(ymd(1999, 1, 15)));
        assert_eq!(parse_date("15/01/202", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_date("December 15, 2024", DateOrder::MonthFirst), Some(ymd(2024, 12, 15)));
        assert_eq!(parse_date("Sept 3 2025", DateOrder::DayFirst), Some(ymd(2025, 9, 3)));
        assert_eq!(parse_date("15 Dec 2024", DateOrder::DayFirst), Some(ymd(2024, 12, 15)));
        assert_eq!(parse_date("Smarch 15, 2024", DateOrder::DayFirst), None);
        assert_eq!(parse_date("February 30, 2024", DateOrder::DayFirst), None);
    }
}
