//! Booked slots, placement failures, and the schedule result.
//!
//! A [`BookedSlot`] is one placed occurrence of an activity. The
//! scheduler's outbound product is a [`ScheduleResult`]: the slots in the
//! order they were booked (phase 1 then phase 2, append order within each
//! phase) plus a per-activity record of occurrences that could not be
//! placed. Downstream consumers must not assume the slot list is
//! date-sorted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::time::{ranges_overlap, ClockTime};

/// A concrete placement of one activity occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSlot {
    /// Activity being performed.
    pub activity_id: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Start of the slot.
    pub start: ClockTime,
    /// Duration in minutes.
    pub duration_minutes: u16,
    /// Specialist bound to this slot, if the activity requires one.
    #[serde(default)]
    pub specialist_id: Option<String>,
    /// Equipment bound to this slot.
    #[serde(default)]
    pub equipment_ids: Vec<String>,
}

impl BookedSlot {
    /// Creates a slot with no resources bound.
    pub fn new(activity_id: impl Into<String>, date: NaiveDate, start: ClockTime, duration_minutes: u16) -> Self {
        Self {
            activity_id: activity_id.into(),
            date,
            start,
            duration_minutes,
            specialist_id: None,
            equipment_ids: Vec::new(),
        }
    }

    /// End of the slot (exclusive).
    #[inline]
    pub fn end(&self) -> ClockTime {
        self.start.plus_minutes(self.duration_minutes)
    }

    /// Whether this slot's clock range overlaps `[start, end)`.
    /// Date equality is the caller's concern.
    #[inline]
    pub fn clock_overlaps(&self, start: ClockTime, end: ClockTime) -> bool {
        ranges_overlap(self.start, self.end(), start, end)
    }
}

/// Why an occurrence could not be placed.
///
/// A closed taxonomy: the hard-constraint validator produces the first
/// seven; `NoCandidate` marks occurrences whose candidate sequence was
/// empty (e.g. the horizon is too short for the occurrence index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// The slot collides with an existing booking on the same day.
    Overlap,
    /// The slot falls outside the activity's window or the schedulable day.
    TimeWindow,
    /// The date falls inside a travel period the activity cannot survive.
    Travel,
    /// The specialist is off, on holiday, or has no covering block.
    SpecialistUnavailable,
    /// The specialist already has an overlapping booking.
    SpecialistBooked,
    /// Required equipment is under maintenance.
    EquipmentUnavailable,
    /// Required equipment already has an overlapping booking.
    EquipmentBooked,
    /// The candidate generator produced nothing for this occurrence.
    NoCandidate,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::Overlap => "overlap",
            FailureReason::TimeWindow => "time-window",
            FailureReason::Travel => "travel",
            FailureReason::SpecialistUnavailable => "specialist-unavailable",
            FailureReason::SpecialistBooked => "specialist-booked",
            FailureReason::EquipmentUnavailable => "equipment-unavailable",
            FailureReason::EquipmentBooked => "equipment-booked",
            FailureReason::NoCandidate => "no-candidate",
        };
        f.write_str(s)
    }
}

/// An occurrence the scheduler could not place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementFailure {
    /// Occurrence index within the activity (0-based).
    pub occurrence: usize,
    /// Categorical reason from the last candidate attempted.
    pub reason: FailureReason,
}

/// The outbound product of a scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Booked slots in booking order (phase 1 first, then phase 2).
    pub slots: Vec<BookedSlot>,
    /// Unplaced occurrences per activity, in (activity id, occurrence)
    /// order. Activities with every occurrence placed are absent.
    pub failures: BTreeMap<String, Vec<PlacementFailure>>,
}

impl ScheduleResult {
    /// Number of booked slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Total number of unplaced occurrences across all activities.
    pub fn failure_count(&self) -> usize {
        self.failures.values().map(Vec::len).sum()
    }

    /// Slots booked for one activity, in booking order.
    pub fn slots_for_activity<'a>(&'a self, activity_id: &'a str) -> impl Iterator<Item = &'a BookedSlot> {
        self.slots.iter().filter(move |s| s.activity_id == activity_id)
    }

    /// Slots booked on one date, in booking order.
    pub fn slots_on(&self, date: NaiveDate) -> impl Iterator<Item = &BookedSlot> {
        self.slots.iter().filter(move |s| s.date == date)
    }

    /// Failures recorded for one activity; empty for fully placed ones.
    pub fn failures_for(&self, activity_id: &str) -> &[PlacementFailure] {
        self.failures.get(activity_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Earliest and latest booked dates, or `None` when nothing booked.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.slots.iter().map(|s| s.date).min()?;
        let max = self.slots.iter().map(|s| s.date).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_slot_end_and_overlap() {
        let slot = BookedSlot::new("a1", date(2025, 3, 3), ClockTime::new(8, 0), 30);
        assert_eq!(slot.end(), ClockTime::new(8, 30));

        assert!(slot.clock_overlaps(ClockTime::new(8, 15), ClockTime::new(8, 45)));
        // Back-to-back slots do not overlap
        assert!(!slot.clock_overlaps(ClockTime::new(8, 30), ClockTime::new(9, 0)));
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::Overlap.to_string(), "overlap");
        assert_eq!(FailureReason::SpecialistUnavailable.to_string(), "specialist-unavailable");
        assert_eq!(FailureReason::NoCandidate.to_string(), "no-candidate");
    }

    #[test]
    fn test_failure_reason_wire_format() {
        let json = serde_json::to_value(FailureReason::EquipmentBooked).unwrap();
        assert_eq!(json, "equipment-booked");
    }

    #[test]
    fn test_result_accessors() {
        let mut result = ScheduleResult::default();
        result.slots.push(BookedSlot::new("a1", date(2025, 3, 4), ClockTime::new(8, 0), 30));
        result.slots.push(BookedSlot::new("a2", date(2025, 3, 3), ClockTime::new(9, 0), 60));
        result.failures.insert(
            "a3".into(),
            vec![PlacementFailure { occurrence: 0, reason: FailureReason::Travel }],
        );

        assert_eq!(result.slot_count(), 2);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.slots_for_activity("a1").count(), 1);
        assert_eq!(result.slots_on(date(2025, 3, 3)).count(), 1);
        assert_eq!(result.failures_for("a3").len(), 1);
        assert!(result.failures_for("a1").is_empty());
        assert_eq!(result.date_range(), Some((date(2025, 3, 3), date(2025, 3, 4))));
    }

    #[test]
    fn test_empty_result() {
        let result = ScheduleResult::default();
        assert_eq!(result.slot_count(), 0);
        assert_eq!(result.date_range(), None);
    }
}
