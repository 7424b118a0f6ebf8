//! Soft-constraint scoring for validated slots.
//!
//! Ranks (date, start) pairs that already passed every hard constraint.
//! The score is a sum of additive bonuses:
//!
//! | Term | Points |
//! |------|--------|
//! | Base | 10 |
//! | Windowed activity starting 06:00-09:00 | +30 |
//! | Windowed activity starting 12:00-16:00 | +20 |
//! | Windowed activity starting 17:00-21:00 | +10 |
//! | Daily activity repeating a prior start time | +20 |
//! | Weekly/monthly activity repeating a prior start time | +15 |
//! | Same-type same-location slot within 2h on the day | +15 |
//!
//! Ties are broken by the drivers: earlier date, then earlier start,
//! then candidate-generation order.

use chrono::NaiveDate;

use crate::models::{Activity, ClockTime, Frequency};

use super::resources::ResourceIndex;
use super::state::SchedulerState;

const BASE: u32 = 10;
const MORNING_BONUS: u32 = 30;
const MIDDAY_BONUS: u32 = 20;
const EVENING_BONUS: u32 = 10;
const DAILY_CONSISTENCY_BONUS: u32 = 20;
const RECURRING_CONSISTENCY_BONUS: u32 = 15;
const GROUPING_BONUS: u32 = 15;
/// Start-to-start distance that still counts as "grouped".
const GROUPING_RADIUS_MINUTES: u16 = 120;

/// Scores validated slots against soft preferences.
#[derive(Debug)]
pub struct SlotScorer<'a> {
    index: &'a ResourceIndex<'a>,
}

impl<'a> SlotScorer<'a> {
    /// Creates a scorer resolving activity tags through `index`.
    pub fn new(index: &'a ResourceIndex<'a>) -> Self {
        Self { index }
    }

    /// Scores a slot that already passed hard-constraint validation.
    pub fn score(
        &self,
        activity: &Activity,
        date: NaiveDate,
        start: ClockTime,
        state: &SchedulerState,
    ) -> u32 {
        BASE + self.time_of_day_bonus(activity, start)
            + self.consistency_bonus(activity, start, state)
            + self.grouping_bonus(activity, date, start, state)
    }

    /// Preferred start-of-day bands, applied only to windowed activities.
    fn time_of_day_bonus(&self, activity: &Activity, start: ClockTime) -> u32 {
        if activity.time_window.is_none() {
            return 0;
        }
        let m = start.minutes();
        if (ClockTime::new(6, 0).minutes()..ClockTime::new(9, 0).minutes()).contains(&m) {
            MORNING_BONUS
        } else if (ClockTime::new(12, 0).minutes()..ClockTime::new(16, 0).minutes()).contains(&m) {
            MIDDAY_BONUS
        } else if (ClockTime::new(17, 0).minutes()..ClockTime::new(21, 0).minutes()).contains(&m) {
            EVENING_BONUS
        } else {
            0
        }
    }

    /// Repeating an already-established start time builds routine.
    fn consistency_bonus(&self, activity: &Activity, start: ClockTime, state: &SchedulerState) -> u32 {
        let bonus = match activity.frequency {
            Frequency::Daily => DAILY_CONSISTENCY_BONUS,
            Frequency::Weekly { .. } | Frequency::Monthly { .. } => RECURRING_CONSISTENCY_BONUS,
            Frequency::Custom { .. } => return 0,
        };
        if state.slots_for_activity(&activity.id).any(|s| s.start == start) {
            bonus
        } else {
            0
        }
    }

    /// Bonus for landing near a same-type, same-location slot on the day.
    fn grouping_bonus(
        &self,
        activity: &Activity,
        date: NaiveDate,
        start: ClockTime,
        state: &SchedulerState,
    ) -> u32 {
        let grouped = state.slots_on(date).any(|slot| {
            let Some(other) = self.index.activity(&slot.activity_id) else {
                return false;
            };
            other.activity_type == activity.activity_type
                && start_distance(slot.start, start) <= GROUPING_RADIUS_MINUTES
                && other.location == activity.location
        });
        if grouped {
            GROUPING_BONUS
        } else {
            0
        }
    }
}

fn start_distance(a: ClockTime, b: ClockTime) -> u16 {
    a.minutes().abs_diff(b.minutes())
}
