//! Clock-time and date-span primitives.
//!
//! Clock times are minutes since midnight; all clock ranges are half-open
//! `[start, end)`. Two ranges overlap iff `a.start < b.end && b.start < a.end`.
//!
//! # Wire Formats
//! Clock times serialize as `HH:MM` (24-hour); dates are `chrono::NaiveDate`
//! and serialize as ISO `YYYY-MM-DD`. Weekdays are integers 0 (Monday)
//! through 6 (Sunday) everywhere in the public API.

use chrono::{Datelike, Months, NaiveDate};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A time of day in minutes since midnight.
///
/// Stored as a plain minute count so that slot ends (`start + duration`)
/// can be computed and compared without wrap-around; values past 24:00
/// are representable but rejected by the day-bounds constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a clock time from hour and minute components.
    pub const fn new(hour: u16, minute: u16) -> Self {
        Self(hour * 60 + minute)
    }

    /// Creates a clock time from a raw minutes-since-midnight count.
    pub const fn from_minutes(minutes: u16) -> Self {
        Self(minutes)
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0-23 for in-day values).
    #[inline]
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    #[inline]
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    /// This time plus a duration in minutes.
    #[inline]
    pub const fn plus_minutes(self, minutes: u16) -> Self {
        Self(self.0 + minutes)
    }

    /// Parses `HH:MM` (24-hour).
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.split_once(':')?;
        if h.len() != 2 || m.len() != 2 {
            return None;
        }
        let hour: u16 = h.parse().ok()?;
        let minute: u16 = m.parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self::new(hour, minute))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid clock time '{s}', expected HH:MM")))
    }
}

/// Whether two half-open clock ranges `[a_start, a_end)` and
/// `[b_start, b_end)` overlap.
#[inline]
pub fn ranges_overlap(a_start: ClockTime, a_end: ClockTime, b_start: ClockTime, b_end: ClockTime) -> bool {
    a_start < b_end && b_start < a_end
}

/// A half-open clock-time interval `[start, end)` within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: ClockTime,
    /// Interval end (exclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub const fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Window length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Whether this window overlaps another (half-open semantics).
    pub fn overlaps(&self, other: &Self) -> bool {
        ranges_overlap(self.start, self.end, other.start, other.end)
    }

    /// Whether the range `[start, end)` lies entirely inside this window.
    #[inline]
    pub fn encloses(&self, start: ClockTime, end: ClockTime) -> bool {
        self.start <= start && end <= self.end
    }
}

/// Weekday of a date as 0 (Monday) through 6 (Sunday).
#[inline]
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Number of days in the calendar month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).expect("day 1 exists in every month");
    let next = first + Months::new(1);
    next.signed_duration_since(first).num_days() as u32
}

/// An inclusive date range, the span scheduling operates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// First schedulable date.
    pub start: NaiveDate,
    /// Last schedulable date (inclusive).
    pub end: NaiveDate,
}

impl Horizon {
    /// Creates a horizon. `end` must not precede `start`; that invariant
    /// is enforced by input validation before scheduling.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered, inclusive of both endpoints.
    pub fn days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }

    /// Number of whole weeks covered (partial trailing week ignored).
    pub fn weeks(&self) -> i64 {
        self.days() / 7
    }

    /// Whether a date falls inside the horizon.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamps a date into the horizon.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.max(self.start).min(self.end)
    }

    /// Iterates every date in the horizon in ascending order.
    pub fn iter_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let days = self.days().max(0) as usize;
        self.start.iter_days().take(days)
    }

    /// First day of every calendar month intersecting the horizon,
    /// ascending. A horizon always covers at least one month.
    pub fn months_covered(&self) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let mut cursor = self.start.with_day(1).expect("day 1 exists in every month");
        while cursor <= self.end {
            months.push(cursor);
            cursor = cursor + Months::new(1);
        }
        months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clock_time_components() {
        let t = ClockTime::new(8, 30);
        assert_eq!(t.minutes(), 510);
        assert_eq!(t.hour(), 8);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.to_string(), "08:30");
    }

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(ClockTime::parse("06:00"), Some(ClockTime::new(6, 0)));
        assert_eq!(ClockTime::parse("23:59"), Some(ClockTime::new(23, 59)));
        assert_eq!(ClockTime::parse("24:00"), None);
        assert_eq!(ClockTime::parse("6:00"), None);
        assert_eq!(ClockTime::parse("0630"), None);
        assert_eq!(ClockTime::parse("06:60"), None);
    }

    #[test]
    fn test_clock_time_plus_minutes() {
        let t = ClockTime::new(20, 30).plus_minutes(480);
        // Past midnight stays representable for comparison purposes
        assert_eq!(t.minutes(), 1710);
        assert!(t > ClockTime::new(21, 0));
    }

    #[test]
    fn test_half_open_overlap() {
        let a = (ClockTime::new(8, 0), ClockTime::new(9, 0));
        let b = (ClockTime::new(8, 30), ClockTime::new(9, 30));
        let c = (ClockTime::new(9, 0), ClockTime::new(10, 0));

        assert!(ranges_overlap(a.0, a.1, b.0, b.1));
        // Touching ranges do not overlap
        assert!(!ranges_overlap(a.0, a.1, c.0, c.1));
    }

    #[test]
    fn test_time_window_encloses() {
        let w = TimeWindow::new(ClockTime::new(8, 0), ClockTime::new(12, 0));
        assert!(w.encloses(ClockTime::new(8, 0), ClockTime::new(12, 0)));
        assert!(w.encloses(ClockTime::new(9, 0), ClockTime::new(10, 0)));
        assert!(!w.encloses(ClockTime::new(7, 30), ClockTime::new(9, 0)));
        assert!(!w.encloses(ClockTime::new(11, 30), ClockTime::new(12, 30)));
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index(date(2025, 3, 3)), 0); // Monday
        assert_eq!(weekday_index(date(2025, 3, 9)), 6); // Sunday
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2025, 1, 15)), 31);
        assert_eq!(days_in_month(date(2025, 2, 1)), 28);
        assert_eq!(days_in_month(date(2024, 2, 1)), 29); // Leap year
        assert_eq!(days_in_month(date(2025, 4, 30)), 30);
    }

    #[test]
    fn test_horizon_days_and_weeks() {
        let h = Horizon::new(date(2025, 3, 3), date(2025, 3, 23));
        assert_eq!(h.days(), 21);
        assert_eq!(h.weeks(), 3);

        let one_day = Horizon::new(date(2025, 3, 3), date(2025, 3, 3));
        assert_eq!(one_day.days(), 1);
        assert_eq!(one_day.weeks(), 0);
    }

    #[test]
    fn test_horizon_iter_dates() {
        let h = Horizon::new(date(2025, 3, 3), date(2025, 3, 5));
        let dates: Vec<_> = h.iter_dates().collect();
        assert_eq!(dates, vec![date(2025, 3, 3), date(2025, 3, 4), date(2025, 3, 5)]);
    }

    #[test]
    fn test_horizon_months_covered() {
        let h = Horizon::new(date(2025, 1, 15), date(2025, 3, 10));
        assert_eq!(
            h.months_covered(),
            vec![date(2025, 1, 1), date(2025, 2, 1), date(2025, 3, 1)]
        );

        let single = Horizon::new(date(2025, 6, 1), date(2025, 6, 30));
        assert_eq!(single.months_covered(), vec![date(2025, 6, 1)]);
    }

    #[test]
    fn test_clock_time_serde() {
        let t = ClockTime::new(7, 5);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"07:05\"");
        let back: ClockTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
