//! Mutable booking state for a scheduling run.
//!
//! The only mutable structure in the core. Owned exclusively by the phase
//! drivers; the validator and scorer see it by shared borrow. Every
//! booking goes through [`SchedulerState::book`], which appends the slot
//! and refreshes all secondary indexes in the same step, so the indexes
//! are consistent before every validator call.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::{BookedSlot, FailureReason, PlacementFailure, ScheduleResult};

/// Append-only booking record with secondary indexes.
#[derive(Debug, Default)]
pub struct SchedulerState {
    /// All booked slots in booking order.
    slots: Vec<BookedSlot>,
    /// date -> slot indices on that date.
    by_date: HashMap<NaiveDate, Vec<usize>>,
    /// activity id -> slot indices for that activity.
    by_activity: HashMap<String, Vec<usize>>,
    /// specialist id -> date -> slot indices binding that specialist.
    by_specialist: HashMap<String, HashMap<NaiveDate, Vec<usize>>>,
    /// equipment id -> date -> slot indices using that equipment.
    by_equipment: HashMap<String, HashMap<NaiveDate, Vec<usize>>>,
    /// activity id -> occurrences placed so far.
    occurrences: HashMap<String, usize>,
    /// activity id -> unplaced occurrences, in recording order.
    failures: BTreeMap<String, Vec<PlacementFailure>>,
}

impl SchedulerState {
    /// Creates empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Books a slot: appends it and updates every secondary index and the
    /// per-activity occurrence counter.
    pub fn book(&mut self, slot: BookedSlot) {
        let idx = self.slots.len();

        self.by_date.entry(slot.date).or_default().push(idx);
        self.by_activity.entry(slot.activity_id.clone()).or_default().push(idx);

        if let Some(specialist_id) = &slot.specialist_id {
            self.by_specialist
                .entry(specialist_id.clone())
                .or_default()
                .entry(slot.date)
                .or_default()
                .push(idx);
        }

        for equipment_id in &slot.equipment_ids {
            self.by_equipment
                .entry(equipment_id.clone())
                .or_default()
                .entry(slot.date)
                .or_default()
                .push(idx);
        }

        *self.occurrences.entry(slot.activity_id.clone()).or_insert(0) += 1;
        self.slots.push(slot);
    }

    /// All booked slots in booking order.
    pub fn slots(&self) -> &[BookedSlot] {
        &self.slots
    }

    /// Slots on a date, in booking order.
    pub fn slots_on(&self, date: NaiveDate) -> impl Iterator<Item = &BookedSlot> {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(|&i| &self.slots[i])
    }

    /// Number of slots booked on a date.
    pub fn booked_count(&self, date: NaiveDate) -> usize {
        self.by_date.get(&date).map(Vec::len).unwrap_or(0)
    }

    /// Slots binding a specialist on a date.
    pub fn specialist_slots_on(&self, specialist_id: &str, date: NaiveDate) -> impl Iterator<Item = &BookedSlot> {
        self.by_specialist
            .get(specialist_id)
            .and_then(|per_date| per_date.get(&date))
            .into_iter()
            .flatten()
            .map(|&i| &self.slots[i])
    }

    /// Slots using an equipment item on a date.
    pub fn equipment_slots_on(&self, equipment_id: &str, date: NaiveDate) -> impl Iterator<Item = &BookedSlot> {
        self.by_equipment
            .get(equipment_id)
            .and_then(|per_date| per_date.get(&date))
            .into_iter()
            .flatten()
            .map(|&i| &self.slots[i])
    }

    /// Slots already placed for an activity, in booking order.
    pub fn slots_for_activity(&self, activity_id: &str) -> impl Iterator<Item = &BookedSlot> {
        self.by_activity
            .get(activity_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.slots[i])
    }

    /// Occurrences placed so far for an activity.
    pub fn occurrence_count(&self, activity_id: &str) -> usize {
        self.occurrences.get(activity_id).copied().unwrap_or(0)
    }

    /// Records an unplaced occurrence.
    pub fn record_failure(&mut self, activity_id: &str, occurrence: usize, reason: FailureReason) {
        self.failures
            .entry(activity_id.to_string())
            .or_default()
            .push(PlacementFailure { occurrence, reason });
    }

    /// Removes the failure record for one occurrence (backfill success).
    pub fn clear_failure(&mut self, activity_id: &str, occurrence: usize) {
        if let Some(list) = self.failures.get_mut(activity_id) {
            list.retain(|f| f.occurrence != occurrence);
            if list.is_empty() {
                self.failures.remove(activity_id);
            }
        }
    }

    /// Activities with recorded failures, in sorted id order.
    pub fn failed_activity_ids(&self) -> Vec<String> {
        self.failures.keys().cloned().collect()
    }

    /// Failure records for one activity.
    pub fn failures_for(&self, activity_id: &str) -> &[PlacementFailure] {
        self.failures.get(activity_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Consumes the state into the outbound result.
    pub fn into_result(self) -> ScheduleResult {
        ScheduleResult {
            slots: self.slots,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot(activity: &str, d: NaiveDate, hour: u16) -> BookedSlot {
        BookedSlot::new(activity, d, ClockTime::new(hour, 0), 30)
    }

    #[test]
    fn test_book_updates_indexes() {
        let mut state = SchedulerState::new();
        let d = date(2025, 3, 3);

        let mut s1 = slot("a1", d, 8);
        s1.specialist_id = Some("spec_001".into());
        s1.equipment_ids = vec!["eq1".into()];
        state.book(s1);
        state.book(slot("a1", date(2025, 3, 4), 8));
        state.book(slot("a2", d, 9));

        assert_eq!(state.slots().len(), 3);
        assert_eq!(state.booked_count(d), 2);
        assert_eq!(state.slots_on(d).count(), 2);
        assert_eq!(state.occurrence_count("a1"), 2);
        assert_eq!(state.occurrence_count("a2"), 1);
        assert_eq!(state.occurrence_count("a3"), 0);
        assert_eq!(state.slots_for_activity("a1").count(), 2);
        assert_eq!(state.specialist_slots_on("spec_001", d).count(), 1);
        assert_eq!(state.specialist_slots_on("spec_001", date(2025, 3, 4)).count(), 0);
        assert_eq!(state.equipment_slots_on("eq1", d).count(), 1);
        assert_eq!(state.equipment_slots_on("eq2", d).count(), 0);
    }

    #[test]
    fn test_failures_record_and_clear() {
        let mut state = SchedulerState::new();
        state.record_failure("a1", 0, FailureReason::Overlap);
        state.record_failure("a1", 2, FailureReason::Travel);
        state.record_failure("b1", 1, FailureReason::SpecialistUnavailable);

        assert_eq!(state.failed_activity_ids(), vec!["a1".to_string(), "b1".to_string()]);
        assert_eq!(state.failures_for("a1").len(), 2);

        state.clear_failure("a1", 0);
        assert_eq!(state.failures_for("a1").len(), 1);
        assert_eq!(state.failures_for("a1")[0].occurrence, 2);

        state.clear_failure("a1", 2);
        assert!(state.failures_for("a1").is_empty());
        assert_eq!(state.failed_activity_ids(), vec!["b1".to_string()]);
    }

    #[test]
    fn test_into_result_preserves_booking_order() {
        let mut state = SchedulerState::new();
        state.book(slot("a2", date(2025, 3, 5), 8));
        state.book(slot("a1", date(2025, 3, 3), 9));
        state.record_failure("a3", 0, FailureReason::NoCandidate);

        let result = state.into_result();
        // Append order, not date order
        assert_eq!(result.slots[0].activity_id, "a2");
        assert_eq!(result.slots[1].activity_id, "a1");
        assert_eq!(result.failures_for("a3")[0].reason, FailureReason::NoCandidate);
    }
}
