//! Display date and research cutoff calculation
//!
//! All arithmetic happens in the configured timezone (Africa/Cairo by default).

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hour at which a newsletter is displayed
const DISPLAY_HOUR: u32 = 9;
/// Hour of the production research cutoff
const PRODUCTION_CUTOFF_HOUR: u32 = 8;

/// Generation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    #[default]
    Test,
}

impl Mode {
    /// `production` selects production; anything else is a test run
    pub fn from_request(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "production" => Self::Production,
            _ => Self::Test,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Capitalised, e.g. `Production`
    pub fn title(&self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Test => "Test",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an issue is shown and which news it may include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDates {
    pub display: DateTime<Tz>,
    pub cutoff: DateTime<Tz>,
}

/// Compute the display time and research cutoff for a run starting at `now`.
///
/// Production targets the current or next Monday at 09:00 with an 08:00
/// cutoff. Test runs target the next 09:00 with a cutoff one hour earlier.
pub fn calculate_dates(now: DateTime<Tz>, mode: Mode) -> ScheduleDates {
    let tz = now.timezone();
    let today = now.date_naive();

    match mode {
        Mode::Production => {
            let days_ahead = (7 - today.weekday().num_days_from_monday()) % 7;
            let monday = today + Duration::days(i64::from(days_ahead));
            ScheduleDates {
                display: at_hour(&tz, monday, DISPLAY_HOUR),
                cutoff: at_hour(&tz, monday, PRODUCTION_CUTOFF_HOUR),
            }
        }
        Mode::Test => {
            let today_display = at_hour(&tz, today, DISPLAY_HOUR);
            let display = if now < today_display {
                today_display
            } else {
                at_hour(&tz, today + Duration::days(1), DISPLAY_HOUR)
            };
            ScheduleDates {
                display,
                cutoff: display - Duration::hours(1),
            }
        }
    }
}

/// Local wall-clock time on `date`; a skipped local time falls back to UTC
fn at_hour(tz: &Tz, date: NaiveDate, hour: u32) -> DateTime<Tz> {
    let naive = date.and_hms_opt(hour, 0, 0).unwrap_or_default();
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};
    use chrono_tz::Africa::Cairo;

    fn cairo(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        Cairo.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_production_uses_next_monday() {
        // Wednesday
        let dates = calculate_dates(cairo(2025, 1, 8, 14, 30), Mode::Production);
        assert_eq!(dates.display, cairo(2025, 1, 13, 9, 0));
        assert_eq!(dates.cutoff, cairo(2025, 1, 13, 8, 0));
        assert_eq!(dates.display.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_production_on_monday_uses_today() {
        let dates = calculate_dates(cairo(2025, 1, 13, 11, 0), Mode::Production);
        assert_eq!(dates.display, cairo(2025, 1, 13, 9, 0));
        assert_eq!(dates.cutoff.hour(), 8);
    }

    #[test]
    fn test_test_mode_before_and_after_nine() {
        let early = calculate_dates(cairo(2025, 1, 8, 7, 15), Mode::Test);
        assert_eq!(early.display, cairo(2025, 1, 8, 9, 0));
        assert_eq!(early.cutoff, cairo(2025, 1, 8, 8, 0));

        let late = calculate_dates(cairo(2025, 1, 8, 9, 0), Mode::Test);
        assert_eq!(late.display, cairo(2025, 1, 9, 9, 0));
        assert_eq!(late.cutoff, cairo(2025, 1, 9, 8, 0));
    }

    #[test]
    fn test_month_rollover_keeps_cairo_offset() {
        // Summer time: UTC+3
        let dates = calculate_dates(cairo(2025, 7, 31, 22, 0), Mode::Test);
        assert_eq!(dates.display, cairo(2025, 8, 1, 9, 0));
        assert_eq!(dates.display.to_rfc3339(), "2025-08-01T09:00:00+03:00");
    }

    #[test]
    fn test_mode_from_request() {
        assert_eq!(Mode::from_request(Some("production")), Mode::Production);
        assert_eq!(Mode::from_request(Some("draft")), Mode::Test);
        assert_eq!(Mode::from_request(None), Mode::Test);
    }
}
