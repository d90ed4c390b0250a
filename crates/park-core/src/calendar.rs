//! # Calendar — Application-Level Dates and Timestamps
//!
//! Defines `Date`, `TimeOfDay` and `Timestamp`. Timestamps are supplied by
//! the caller with every entrance and exit; nothing here consults the wall
//! clock.
//!
//! ## Calendar Rules
//!
//! - Every year has 365 days. February always has 28 days.
//! - A date is valid when `1 <= month <= 12` and
//!   `1 <= day <= days_in_month(month)`. The year is unconstrained.
//! - A time is valid when `hour <= 23` and `minute <= 59`.
//!
//! Parsing (`FromStr`) only checks the textual shape `DD-MM-YYYY` /
//! `HH:MM`. Calendrical validity is a separate [`Timestamp::is_valid`]
//! check so that the ledger can reject it as `invalid date.` rather than as
//! a parse failure.
//!
//! ## Total Minutes
//!
//! `total_minutes = ((year * 365 + days_before(month) + day - 1) * 24 + hour) * 60 + minute`
//!
//! Elapsed time between two timestamps is the difference of their totals.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Days in one calendar year.
pub const DAYS_PER_YEAR: i64 = 365;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Number of days in `month` (1-based), or `None` outside `1..=12`.
pub fn days_in_month(month: u32) -> Option<u32> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    DAYS_IN_MONTH.get(idx).copied()
}

/// Days elapsed in the year before the first of `month`.
fn days_before_month(month: u32) -> i64 {
    let preceding = usize::try_from(month.saturating_sub(1)).unwrap_or(0);
    DAYS_IN_MONTH
        .iter()
        .take(preceding)
        .map(|d| i64::from(*d))
        .sum()
}

/// Split `input` on `sep` into exactly `N` non-empty ASCII digit groups.
fn digit_groups<const N: usize>(input: &str, sep: char) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = input.split(sep);
    for slot in out.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

// ─── Date ────────────────────────────────────────────────────────────

/// A calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Date {
    /// Day of month, 1-based.
    pub day: u32,
    /// Month, 1-based.
    pub month: u32,
    /// Year.
    pub year: u32,
}

impl Date {
    /// Stand-in for a literal that could not be read. Never valid.
    pub const UNREADABLE: Self = Self::new(0, 0, 0);

    /// Build a date without validating it.
    pub const fn new(day: u32, month: u32, year: u32) -> Self {
        Self { day, month, year }
    }

    /// Whether the month exists and the day fits in it.
    pub fn is_valid(&self) -> bool {
        match days_in_month(self.month) {
            Some(len) => self.day >= 1 && self.day <= len,
            None => false,
        }
    }

    /// Days since the start of year zero.
    pub fn ordinal_days(&self) -> i64 {
        i64::from(self.year) * DAYS_PER_YEAR + days_before_month(self.month) + i64::from(self.day)
            - 1
    }

    /// Same calendar day.
    pub fn same_day(&self, other: &Date) -> bool {
        self == other
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Date {
    type Err = CalendarError;

    /// Parse `DD-MM-YYYY`. Shape only; see [`Date::is_valid`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [day, month, year] =
            digit_groups::<3>(s, '-').ok_or_else(|| CalendarError::MalformedDate {
                input: s.to_string(),
            })?;
        Ok(Self::new(day, month, year))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }
}

// ─── Time of day ─────────────────────────────────────────────────────

/// Hour and minute within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: Self = Self::new(0, 0);

    /// Build a time without validating it.
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    /// Whether `hour <= 23` and `minute <= 59`.
    pub fn is_valid(&self) -> bool {
        self.hour < 24 && self.minute < 60
    }
}

impl FromStr for TimeOfDay {
    type Err = CalendarError;

    /// Parse `HH:MM`. Shape only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [hour, minute] =
            digit_groups::<2>(s, ':').ok_or_else(|| CalendarError::MalformedTime {
                input: s.to_string(),
            })?;
        Ok(Self::new(hour, minute))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ─── Timestamp ───────────────────────────────────────────────────────

/// A date plus a time of day, as supplied with an entrance or exit.
///
/// Ordering follows [`Timestamp::total_minutes`] for valid timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Calendar day.
    pub date: Date,
    /// Time within the day.
    pub time: TimeOfDay,
}

impl Timestamp {
    /// Stand-in for literals that could not be read. Never valid.
    pub const UNREADABLE: Self = Self::start_of(Date::UNREADABLE);

    /// Build a timestamp without validating it.
    pub const fn new(date: Date, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    /// Midnight at the start of `date`.
    pub const fn start_of(date: Date) -> Self {
        Self::new(date, TimeOfDay::MIDNIGHT)
    }

    /// Parse the pair of literals `DD-MM-YYYY` and `HH:MM`.
    pub fn parse(date: &str, time: &str) -> Result<Self, CalendarError> {
        Ok(Self::new(date.parse()?, time.parse()?))
    }

    /// Whether both the date and the time are calendrically valid.
    pub fn is_valid(&self) -> bool {
        self.date.is_valid() && self.time.is_valid()
    }

    /// Minutes since the start of year zero.
    pub fn total_minutes(&self) -> i64 {
        (self.date.ordinal_days() * 24 + i64::from(self.time.hour)) * 60
            + i64::from(self.time.minute)
    }

    /// Minutes from `self` to `later`; negative if `later` is earlier.
    pub fn minutes_until(&self, later: &Timestamp) -> i64 {
        later.total_minutes() - self.total_minutes()
    }

    /// Same calendar day.
    pub fn same_day(&self, other: &Timestamp) -> bool {
        self.date.same_day(&other.date)
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.date, self.time).cmp(&(other.date, other.time))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(date: &str, time: &str) -> Timestamp {
        Timestamp::parse(date, time).unwrap()
    }

    #[test]
    fn parse_and_display_are_zero_padded() {
        let t = ts("1-2-2024", "8:5");
        assert_eq!(t.to_string(), "01-02-2024 08:05");
    }

    #[test]
    fn malformed_literals_rejected() {
        assert!("01/01/2024".parse::<Date>().is_err());
        assert!("01-01".parse::<Date>().is_err());
        assert!("01-01-2024-1".parse::<Date>().is_err());
        assert!("aa-01-2024".parse::<Date>().is_err());
        assert!("0800".parse::<TimeOfDay>().is_err());
        assert!("08:".parse::<TimeOfDay>().is_err());
        assert!("-8:00".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn unreadable_stand_ins_are_never_valid() {
        assert!(!Date::UNREADABLE.is_valid());
        assert!(!Timestamp::UNREADABLE.is_valid());
    }

    #[test]
    fn shape_valid_but_calendar_invalid() {
        assert!(!ts("29-02-2024", "10:00").is_valid());
        assert!(!ts("31-04-2024", "10:00").is_valid());
        assert!(!ts("00-01-2024", "10:00").is_valid());
        assert!(!ts("01-13-2024", "10:00").is_valid());
        assert!(!ts("01-01-2024", "24:00").is_valid());
        assert!(!ts("01-01-2024", "23:60").is_valid());
        assert!(ts("28-02-2024", "23:59").is_valid());
        assert!(ts("31-12-2024", "00:00").is_valid());
    }

    #[test]
    fn total_minutes_crosses_month_and_year() {
        let a = ts("31-01-2024", "23:00");
        let b = ts("01-02-2024", "01:00");
        assert_eq!(a.minutes_until(&b), 120);

        let c = ts("31-12-2023", "23:59");
        let d = ts("01-01-2024", "00:00");
        assert_eq!(c.minutes_until(&d), 1);

        let e = ts("28-02-2024", "12:00");
        let f = ts("01-03-2024", "12:00");
        assert_eq!(e.minutes_until(&f), MINUTES_PER_DAY);
    }

    #[test]
    fn a_year_is_365_days() {
        let a = ts("05-06-2023", "10:00");
        let b = ts("05-06-2024", "10:00");
        assert_eq!(a.minutes_until(&b), 365 * MINUTES_PER_DAY);
    }

    #[test]
    fn ordering_matches_total_minutes() {
        let a = ts("02-01-2024", "00:00");
        let b = ts("01-02-2024", "00:00");
        assert!(a < b);
        assert!(a.total_minutes() < b.total_minutes());
        let c = ts("01-01-2025", "00:00");
        assert!(b < c);
    }

    #[test]
    fn same_day_ignores_time() {
        assert!(ts("03-03-2024", "00:00").same_day(&ts("03-03-2024", "23:59")));
        assert!(!ts("03-03-2024", "23:59").same_day(&ts("04-03-2024", "00:00")));
    }

    #[test]
    fn days_in_month_bounds() {
        assert_eq!(days_in_month(0), None);
        assert_eq!(days_in_month(2), Some(28));
        assert_eq!(days_in_month(12), Some(31));
        assert_eq!(days_in_month(13), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn valid_timestamp() -> impl Strategy<Value = Timestamp> {
        (1u32..=12, 1900u32..2100, 0u32..24, 0u32..60)
            .prop_flat_map(|(month, year, hour, minute)| {
                let len = days_in_month(month).unwrap_or(28);
                (1u32..=len).prop_map(move |day| {
                    Timestamp::new(Date::new(day, month, year), TimeOfDay::new(hour, minute))
                })
            })
    }

    proptest! {
        /// Display output parses back to the same timestamp.
        #[test]
        fn display_parses_back(t in valid_timestamp()) {
            let text = t.to_string();
            let (date, time) = text.split_once(' ').unwrap();
            prop_assert_eq!(Timestamp::parse(date, time).unwrap(), t);
        }

        /// Ordering agrees with total minutes for valid timestamps.
        #[test]
        fn ordering_agrees_with_minutes(a in valid_timestamp(), b in valid_timestamp()) {
            prop_assert_eq!(a.cmp(&b), a.total_minutes().cmp(&b.total_minutes()));
        }
    }
}
