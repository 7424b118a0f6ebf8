//! Schedule quality metrics.
//!
//! Aggregates a completed run into the numbers worth watching:
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Success rate | placed occurrences / required occurrences |
//! | Priority bands | the same, split by priority 1-5 |
//! | Busiest day | date with the most bookings |
//! | Resource usage | bookings per specialist / equipment item |
//! | Failure mix | unplaced occurrences per categorical reason |
//!
//! Pure function of the run's inputs and its result; computing metrics
//! never touches scheduler state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Activity, FailureReason, Horizon, ScheduleResult};

/// Placement statistics for one priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBand {
    /// Occurrences demanded by activities at this priority.
    pub required: usize,
    /// Occurrences actually placed.
    pub placed: usize,
}

impl PriorityBand {
    /// placed / required, or 1.0 when nothing was required.
    pub fn success_rate(&self) -> f64 {
        if self.required == 0 {
            1.0
        } else {
            self.placed as f64 / self.required as f64
        }
    }
}

/// Aggregated metrics for a completed scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Occurrences demanded across all activities.
    pub total_required: usize,
    /// Slots actually booked.
    pub total_placed: usize,
    /// Per-priority placement statistics.
    pub by_priority: BTreeMap<u8, PriorityBand>,
    /// Date with the most bookings (earliest wins ties).
    pub busiest_day: Option<(NaiveDate, usize)>,
    /// Bookings per specialist.
    pub specialist_bookings: BTreeMap<String, usize>,
    /// Bookings per equipment item.
    pub equipment_bookings: BTreeMap<String, usize>,
    /// Unplaced occurrences per categorical reason.
    pub failures_by_reason: BTreeMap<FailureReason, usize>,
}

impl ScheduleMetrics {
    /// Computes metrics from a run's inputs and result.
    pub fn calculate(result: &ScheduleResult, activities: &[Activity], horizon: &Horizon) -> Self {
        let mut total_required = 0usize;
        let mut by_priority: BTreeMap<u8, PriorityBand> = BTreeMap::new();

        for activity in activities {
            let required = activity.frequency.required_occurrences(horizon);
            let placed = result.slots_for_activity(&activity.id).count();
            total_required += required;

            let band = by_priority.entry(activity.priority).or_default();
            band.required += required;
            band.placed += placed;
        }

        let mut per_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut specialist_bookings: BTreeMap<String, usize> = BTreeMap::new();
        let mut equipment_bookings: BTreeMap<String, usize> = BTreeMap::new();
        for slot in &result.slots {
            *per_date.entry(slot.date).or_default() += 1;
            if let Some(sid) = &slot.specialist_id {
                *specialist_bookings.entry(sid.clone()).or_default() += 1;
            }
            for eid in &slot.equipment_ids {
                *equipment_bookings.entry(eid.clone()).or_default() += 1;
            }
        }
        // BTreeMap iterates dates ascending, so with a strict comparison
        // the earliest date wins ties
        let busiest_day = per_date
            .iter()
            .fold(None, |best: Option<(NaiveDate, usize)>, (&d, &n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((d, n)),
            });

        let mut failures_by_reason: BTreeMap<FailureReason, usize> = BTreeMap::new();
        for failures in result.failures.values() {
            for f in failures {
                *failures_by_reason.entry(f.reason).or_default() += 1;
            }
        }

        Self {
            total_required,
            total_placed: result.slots.len(),
            by_priority,
            busiest_day,
            specialist_bookings,
            equipment_bookings,
            failures_by_reason,
        }
    }

    /// Overall success rate: placed / required, or 1.0 for an empty run.
    pub fn overall_success_rate(&self) -> f64 {
        if self.total_required == 0 {
            1.0
        } else {
            self.total_placed as f64 / self.total_required as f64
        }
    }

    /// Whether success rates never improve as priority loosens: for
    /// every pair of occupied bands p < q, rate(p) >= rate(q).
    pub fn priority_rates_monotonic(&self) -> bool {
        let rates: Vec<f64> = self
            .by_priority
            .values()
            .filter(|band| band.required > 0)
            .map(PriorityBand::success_rate)
            .collect();
        rates.windows(2).all(|w| w[0] >= w[1])
    }
}
