//! Candidate (date, start) generation for one activity occurrence.
//!
//! Each occurrence k derives a primary date from its frequency pattern,
//! augmented with backup dates:
//!
//! - **Daily**: horizon start + k; no backups.
//! - **Weekly**: the target weekday inside week `k / count`, plus the same
//!   weekday in every other week of the horizon, ascending (the
//!   flexible-week fallback). Without the fallback, a single busy week
//!   permanently loses its occurrences.
//! - **Monthly**: occurrence k targets month `k / count` at day-of-month
//!   `1 + (k % count) * (daysInMonth / count)`, clamped into the horizon;
//!   no backups.
//! - **Custom**: horizon start + k * interval; no backups.
//!
//! For priorities 3-5 the date list is re-sorted ascending by how many
//! slots each date already carries (stable, so the primary leads on
//! ties), spreading optional work off congested days. Within each date,
//! start times run ascending on a fixed half-hour grid, restricted to the
//! activity's window when it has one.
//!
//! The generator is lazy: consumers may stop after any prefix.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::time::{days_in_month, weekday_index};
use crate::models::{Activity, ClockTime, Frequency, Horizon};

use super::state::SchedulerState;
use super::SchedulerConfig;

/// Lazy sequence of candidate (date, start) pairs for one occurrence.
#[derive(Debug)]
pub struct CandidateGenerator {
    dates: Vec<NaiveDate>,
    starts: Vec<ClockTime>,
    date_pos: usize,
    start_pos: usize,
}

impl CandidateGenerator {
    /// Builds the phase-1 generator for occurrence `occurrence` of
    /// `activity`, with pattern-derived dates (lightness-ordered for
    /// priorities 3-5).
    pub fn for_occurrence(
        activity: &Activity,
        occurrence: usize,
        horizon: &Horizon,
        state: &SchedulerState,
        config: &SchedulerConfig,
    ) -> Self {
        let mut dates = pattern_dates(activity, occurrence, horizon);
        if activity.priority >= 3 {
            // Stable: the primary stays first only when tied
            dates.sort_by_key(|&d| state.booked_count(d));
        }
        Self::from_parts(dates, admissible_starts(activity, config))
    }

    /// Builds a generator over an explicit date list, used by the
    /// backfill phase (light days, already ordered by the caller).
    pub fn for_dates(activity: &Activity, dates: Vec<NaiveDate>, config: &SchedulerConfig) -> Self {
        Self::from_parts(dates, admissible_starts(activity, config))
    }

    fn from_parts(dates: Vec<NaiveDate>, starts: Vec<ClockTime>) -> Self {
        Self {
            dates,
            starts,
            date_pos: 0,
            start_pos: 0,
        }
    }

    /// Candidate dates in the order they will be emitted.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }
}

impl Iterator for CandidateGenerator {
    type Item = (NaiveDate, ClockTime);

    fn next(&mut self) -> Option<Self::Item> {
        if self.starts.is_empty() {
            return None;
        }
        let date = *self.dates.get(self.date_pos)?;
        let start = self.starts[self.start_pos];

        self.start_pos += 1;
        if self.start_pos == self.starts.len() {
            self.start_pos = 0;
            self.date_pos += 1;
        }
        Some((date, start))
    }
}

/// Pattern-derived candidate dates for one occurrence: primary first,
/// then backups in ascending order.
fn pattern_dates(activity: &Activity, occurrence: usize, horizon: &Horizon) -> Vec<NaiveDate> {
    let mut dates = Vec::new();

    match &activity.frequency {
        Frequency::Daily => {
            let date = horizon.start + Days::new(occurrence as u64);
            if horizon.contains(date) {
                dates.push(date);
            }
        }
        Frequency::Weekly { count, preferred_days } => {
            let count = (*count).max(1) as usize;
            let week = occurrence / count;
            let j = occurrence % count;
            let target_weekday = if preferred_days.is_empty() {
                (j % 5) as u8
            } else {
                preferred_days[j % preferred_days.len()]
            };
            let offset =
                (target_weekday as i64 - weekday_index(horizon.start) as i64).rem_euclid(7) as u64;

            let primary = horizon.start + Days::new(week as u64 * 7 + offset);
            if horizon.contains(primary) {
                dates.push(primary);
            }
            for alt_week in 0..horizon.weeks().max(0) as usize {
                if alt_week == week {
                    continue;
                }
                let backup = horizon.start + Days::new(alt_week as u64 * 7 + offset);
                if horizon.contains(backup) {
                    dates.push(backup);
                }
            }
        }
        Frequency::Monthly { count } => {
            let count = (*count).max(1) as u32;
            let months = horizon.months_covered();
            let month = occurrence / count as usize;
            let j = (occurrence % count as usize) as u32;
            if let Some(&month_first) = months.get(month) {
                let dim = days_in_month(month_first);
                let day_of_month = (1 + j * (dim / count)).min(dim);
                let date = month_first
                    .with_day(day_of_month)
                    .expect("day-of-month stays within the month");
                dates.push(horizon.clamp(date));
            }
        }
        Frequency::Custom { interval_days } => {
            let date = horizon.start + Days::new(occurrence as u64 * (*interval_days).max(1) as u64);
            if horizon.contains(date) {
                dates.push(date);
            }
        }
    }

    dates
}

/// Start times admissible for the activity on any date: the half-hour
/// grid across the schedulable day, narrowed to the activity's window
/// when it has one.
fn admissible_starts(activity: &Activity, config: &SchedulerConfig) -> Vec<ClockTime> {
    let mut starts = Vec::new();
    let granularity = config.slot_granularity_minutes.max(1);
    let mut t = config.day_window.start;
    while t < config.day_window.end {
        let admitted = match &activity.time_window {
            Some(window) => window.encloses(t, activity.end_for(t)),
            None => true,
        };
        if admitted {
            starts.push(t);
        }
        t = t.plus_minutes(granularity);
    }
    starts
}
