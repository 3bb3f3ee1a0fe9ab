//! Calendar collaborators for date rules
//!
//! Holiday policy and "today" are injected so the date checks stay pure and
//! testable. Both are built once and shared read-only.

use std::collections::HashSet;

use chrono::{Datelike, Local, NaiveDate, Weekday};

/// Answers whether a date is a non-business holiday.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Supplies the evaluation date for `minDate: "today"`.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 2025 US federal holidays (observed dates).
const US_FEDERAL_2025: [(i32, u32, u32); 11] = [
    (2025, 1, 1),
    (2025, 1, 20),
    (2025, 2, 17),
    (2025, 5, 26),
    (2025, 6, 19),
    (2025, 7, 4),
    (2025, 9, 1),
    (2025, 10, 13),
    (2025, 11, 11),
    (2025, 11, 27),
    (2025, 12, 25),
];

/// A finite, fixed set of holiday dates.
///
/// Dates outside the set are never holidays; in particular the default set
/// covers 2025 only and applies no exclusions to any other year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedHolidays {
    dates: HashSet<NaiveDate>,
}

impl FixedHolidays {
    /// An empty calendar (no holidays)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The 2025 US federal holiday calendar
    pub fn us_federal_2025() -> Self {
        US_FEDERAL_2025
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .collect()
    }

    /// Number of holidays in the set
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for FixedHolidays {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

impl HolidayCalendar for FixedHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_us_federal_2025() {
        let holidays = FixedHolidays::us_federal_2025();
        assert_eq!(holidays.len(), 11);
        assert!(holidays.is_holiday(date(2025, 1, 1)));
        assert!(holidays.is_holiday(date(2025, 12, 25)));
        assert!(!holidays.is_holiday(date(2025, 5, 7)));
    }

    #[test]
    fn test_other_years_have_no_holidays() {
        let holidays = FixedHolidays::us_federal_2025();
        assert!(!holidays.is_holiday(date(2026, 1, 1)));
        assert!(!holidays.is_holiday(date(2024, 12, 25)));
    }

    #[test]
    fn test_custom_calendar() {
        let holidays: FixedHolidays = vec![date(2026, 3, 17)].into_iter().collect();
        assert!(holidays.is_holiday(date(2026, 3, 17)));
        assert!(!FixedHolidays::empty().is_holiday(date(2025, 1, 1)));
    }

    #[test]
    fn test_weekend() {
        assert!(is_weekend(date(2025, 5, 10)));
        assert!(is_weekend(date(2025, 5, 11)));
        assert!(!is_weekend(date(2025, 5, 7)));
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date(2025, 5, 1));
        assert_eq!(clock.today(), date(2025, 5, 1));
    }
}
