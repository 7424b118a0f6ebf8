//! Hard-constraint validation for proposed slots.
//!
//! Decides whether an activity occurrence CAN land at a given (date,
//! start): a binary answer with a categorical rejection reason. The
//! rules run in a fixed order and the first failure wins:
//!
//! 1. Day boundary (the schedulable day)
//! 2. Activity time window
//! 3. Travel compatibility
//! 4. Calendar overlap
//! 5. Specialist (time off, block coverage, double-booking)
//! 6. Equipment (maintenance, double-booking)
//!
//! Soft preferences are a separate concern; see the scoring module.

use chrono::NaiveDate;

use crate::models::{Activity, ClockTime, FailureReason, TimeWindow};

use super::resources::ResourceIndex;
use super::state::SchedulerState;

/// Validates proposed slots against all hard constraints.
#[derive(Debug)]
pub struct ConstraintChecker<'a> {
    index: &'a ResourceIndex<'a>,
    /// The schedulable day, default 06:00-21:00.
    day: TimeWindow,
}

impl<'a> ConstraintChecker<'a> {
    /// Creates a checker over a resource index and a schedulable-day
    /// window.
    pub fn new(index: &'a ResourceIndex<'a>, day: TimeWindow) -> Self {
        Self { index, day }
    }

    /// Checks whether `activity` can occupy `[start, start + duration)`
    /// on `date` given the current bookings.
    ///
    /// Returns `Ok(())` when every rule passes, or the reason of the
    /// first rule that rejects. A rejection is final for this
    /// (date, start) pair.
    pub fn check(
        &self,
        activity: &Activity,
        date: NaiveDate,
        start: ClockTime,
        state: &SchedulerState,
    ) -> Result<(), FailureReason> {
        let end = activity.end_for(start);

        // 1. The slot must fit inside the schedulable day.
        if !self.day.encloses(start, end) {
            return Err(FailureReason::TimeWindow);
        }

        // 2. The slot must fit inside the activity's own window.
        if let Some(window) = &activity.time_window {
            if !window.encloses(start, end) {
                return Err(FailureReason::TimeWindow);
            }
        }

        // 3. Travel: non-remote activities never run during a trip;
        // remote ones only when the trip allows them.
        for travel in self.index.travel_covering(date) {
            if !activity.remote_capable || !travel.remote_allowed {
                return Err(FailureReason::Travel);
            }
        }

        // 4. One client, one calendar: no overlap with any booking that day.
        if state.slots_on(date).any(|s| s.clock_overlaps(start, end)) {
            return Err(FailureReason::Overlap);
        }

        // 5. Specialist availability and exclusivity.
        if let Some(specialist_id) = &activity.specialist_id {
            let Some(specialist) = self.index.specialist(specialist_id) else {
                return Err(FailureReason::SpecialistUnavailable);
            };
            if specialist.is_off(date) || !specialist.covers(date, start, end) {
                return Err(FailureReason::SpecialistUnavailable);
            }
            if state
                .specialist_slots_on(specialist_id, date)
                .any(|s| s.clock_overlaps(start, end))
            {
                return Err(FailureReason::SpecialistBooked);
            }
        }

        // 6. Equipment maintenance and exclusivity.
        for equipment_id in &activity.equipment_ids {
            let Some(equipment) = self.index.equipment(equipment_id) else {
                return Err(FailureReason::EquipmentUnavailable);
            };
            if equipment
                .maintenance_windows()
                .iter()
                .any(|w| w.blocks(date, start, end))
            {
                return Err(FailureReason::EquipmentUnavailable);
            }
            if state
                .equipment_slots_on(equipment_id, date)
                .any(|s| s.clock_overlaps(start, end))
            {
                return Err(FailureReason::EquipmentBooked);
            }
        }

        Ok(())
    }
}
