use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const DUE_DATE_NOT_SET: &str = "Due Date is not set";
pub const INVALID_QUARTER: &str = "Invalid quarter";
pub const NO_START_DATE: &str = "No start date has been set.";
pub const NO_END_DATE: &str = "No end date has been set.";

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Calendar quarter (1-4) of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// A quarter within a two-digit year, as rendered in `Q2-24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterYear {
    /// Two-digit year (e.g., 24 for 2024)
    pub year: u32,
    pub quarter: u32,
}

impl QuarterYear {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year().rem_euclid(100).unsigned_abs(),
            quarter: quarter_of(date),
        }
    }
}

impl fmt::Display for QuarterYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{:02}", self.quarter, self.year)
    }
}

/// `Q<quarter>-<yy>` label for an optional date.
pub fn quarter_year_label(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || DUE_DATE_NOT_SET.to_string(),
        |date| QuarterYear::of(date).to_string(),
    )
}

/// Signed day count from `today` to the last day of a quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterCountdown {
    Days(i64),
    InvalidQuarter,
}

impl fmt::Display for QuarterCountdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::InvalidQuarter => f.write_str(INVALID_QUARTER),
        }
    }
}

/// Days from `today` until the end of `target`'s quarter; negative once it
/// has passed.
pub fn days_until_end_of_quarter(target: QuarterYear, today: NaiveDate) -> QuarterCountdown {
    let (month, day) = match target.quarter {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        4 => (12, 31),
        _ => return QuarterCountdown::InvalidQuarter,
    };

    #[allow(clippy::cast_possible_wrap)]
    let year = 2000 + target.year as i32;

    NaiveDate::from_ymd_opt(year, month, day).map_or(QuarterCountdown::InvalidQuarter, |end| {
        QuarterCountdown::Days((end - today).num_days())
    })
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Time elapsed since a start date, in whole years or days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elapsed {
    Years(i64),
    Days(i64),
    NotSet,
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(years) => write!(f, "{years} years"),
            Self::Days(days) => write!(f, "{days} days"),
            Self::NotSet => f.write_str(NO_START_DATE),
        }
    }
}

/// Humanized time since `start`.
///
/// Reports years once the elapsed days reach the total length of every
/// calendar year from `start`'s year through `now`'s year (leap years count
/// 366), and days otherwise.
pub fn elapsed_since(start: Option<NaiveDate>, now: NaiveDateTime) -> Elapsed {
    let Some(start) = start else {
        return Elapsed::NotSet;
    };

    let start_of_day = start.and_hms_opt(0, 0, 0).unwrap_or_default();
    let elapsed_days = (now - start_of_day).num_seconds().div_euclid(86_400);

    let span_days: i64 = (start.year()..=now.year()).map(days_in_year).sum();

    if span_days > 0 && elapsed_days >= span_days {
        Elapsed::Years(elapsed_days / span_days)
    } else {
        Elapsed::Days(elapsed_days)
    }
}

/// Days left until an end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Days(i64),
    NotSet,
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::NotSet => f.write_str(NO_END_DATE),
        }
    }
}

/// `round((end - now) / 1 day)`, with ties rounded to even.
pub fn remaining_days(end: Option<NaiveDate>, now: NaiveDateTime) -> Remaining {
    let Some(end) = end else {
        return Remaining::NotSet;
    };

    let end_of_range = end.and_hms_opt(0, 0, 0).unwrap_or_default();
    #[allow(clippy::cast_precision_loss)]
    let days = (end_of_range - now).num_seconds() as f64 / SECONDS_PER_DAY;

    #[allow(clippy::cast_possible_truncation)]
    Remaining::Days(days.round_ties_even() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    #[cfg(test)]
    mod quarters {
        use super::*;

        #[test]
        fn month_boundaries() {
            assert_eq!(quarter_of(date(2024, 1, 1)), 1);
            assert_eq!(quarter_of(date(2024, 3, 31)), 1);
            assert_eq!(quarter_of(date(2024, 4, 1)), 2);
            assert_eq!(quarter_of(date(2024, 6, 15)), 2);
            assert_eq!(quarter_of(date(2024, 12, 31)), 4);
        }

        #[test]
        fn label_uses_two_digit_year() {
            assert_eq!(quarter_year_label(Some(date(2024, 6, 15))), "Q2-24");
            assert_eq!(quarter_year_label(Some(date(2009, 11, 2))), "Q4-09");
        }

        #[test]
        fn label_for_missing_date_is_sentinel() {
            assert_eq!(quarter_year_label(None), DUE_DATE_NOT_SET);
        }
    }

    #[cfg(test)]
    mod end_of_quarter {
        use super::*;

        #[test]
        fn counts_days_to_quarter_end() {
            let target = QuarterYear { year: 24, quarter: 2 };
            assert_eq!(
                days_until_end_of_quarter(target, date(2024, 5, 1)),
                QuarterCountdown::Days(60)
            );
        }

        #[test]
        fn past_quarter_is_negative() {
            let target = QuarterYear { year: 23, quarter: 4 };
            assert_eq!(
                days_until_end_of_quarter(target, date(2024, 1, 10)),
                QuarterCountdown::Days(-10)
            );
        }

        #[test]
        fn out_of_range_quarter_is_sentinel() {
            let target = QuarterYear { year: 24, quarter: 5 };
            let result = days_until_end_of_quarter(target, date(2024, 5, 1));
            assert_eq!(result, QuarterCountdown::InvalidQuarter);
            assert_eq!(result.to_string(), INVALID_QUARTER);

            let zero = QuarterYear { year: 24, quarter: 0 };
            assert_eq!(
                days_until_end_of_quarter(zero, date(2024, 5, 1)),
                QuarterCountdown::InvalidQuarter
            );
        }
    }

    #[cfg(test)]
    mod elapsed {
        use super::*;

        #[test]
        fn leap_years() {
            assert!(is_leap_year(2024));
            assert!(is_leap_year(2000));
            assert!(!is_leap_year(1900));
            assert!(!is_leap_year(2023));
        }

        #[test]
        fn missing_start_date() {
            let result = elapsed_since(None, at(2024, 5, 1, 9));
            assert_eq!(result, Elapsed::NotSet);
            assert_eq!(result.to_string(), NO_START_DATE);
        }

        #[test]
        fn reports_days_within_span() {
            let result = elapsed_since(Some(date(2024, 4, 1)), at(2024, 5, 1, 9));
            assert_eq!(result, Elapsed::Days(30));
            assert_eq!(result.to_string(), "30 days");
        }

        #[test]
        fn days_below_multi_year_span_stay_days() {
            // 2022..=2024 spans 1096 days, more than the 700 elapsed
            let result = elapsed_since(Some(date(2022, 6, 1)), at(2024, 5, 1, 9));
            assert_eq!(result, Elapsed::Days(700));
        }

        #[test]
        fn span_counts_whole_calendar_years() {
            // 730 elapsed days against a 731-day span (2023 + leap 2024)
            let result = elapsed_since(Some(date(2023, 1, 1)), at(2024, 12, 31, 12));
            assert_eq!(result, Elapsed::Days(730));

            let result = elapsed_since(Some(date(2024, 1, 1)), at(2024, 12, 31, 12));
            assert_eq!(result, Elapsed::Days(365));
        }

        #[test]
        fn future_start_is_negative_days() {
            let result = elapsed_since(Some(date(2024, 5, 3)), at(2024, 5, 1, 12));
            assert_eq!(result, Elapsed::Days(-2));
        }
    }

    #[cfg(test)]
    mod remaining {
        use super::*;

        #[test]
        fn missing_end_date() {
            let result = remaining_days(None, at(2024, 5, 1, 9));
            assert_eq!(result, Remaining::NotSet);
            assert_eq!(result.to_string(), NO_END_DATE);
        }

        #[test]
        fn rounds_to_nearest_day() {
            // 9 days and 15 hours
            assert_eq!(
                remaining_days(Some(date(2024, 5, 11)), at(2024, 5, 1, 9)),
                Remaining::Days(10)
            );
            // 9 days and 3 hours
            assert_eq!(
                remaining_days(Some(date(2024, 5, 11)), at(2024, 5, 1, 21)),
                Remaining::Days(9)
            );
        }

        #[test]
        fn half_days_round_to_even() {
            // 2.5 days
            assert_eq!(
                remaining_days(Some(date(2024, 5, 4)), at(2024, 5, 1, 12)),
                Remaining::Days(2)
            );
        }

        #[test]
        fn past_end_date_is_negative() {
            assert_eq!(
                remaining_days(Some(date(2024, 4, 1)), at(2024, 5, 1, 0)),
                Remaining::Days(-30)
            );
        }
    }
}
