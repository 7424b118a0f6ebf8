//! Two-phase deterministic scheduler.
//!
//! # Algorithm
//!
//! **Phase 1 (greedy).** Activities are sorted by (priority ascending,
//! frequency rank ascending, id). For each occurrence of each activity the
//! candidate generator is walked in order, every candidate is validated
//! against the hard constraints, and the first `candidate_cap` accepted
//! candidates are scored; the best-scoring one is booked. An occurrence
//! with no accepted candidate is recorded as failed with the last
//! rejection reason.
//!
//! **Phase 2 (backfill).** Activities with unplaced occurrences retry on
//! "light" days (dates carrying fewer than `light_day_threshold`
//! bookings), lightest first. Light-day status is re-evaluated before
//! every attempt; a backfill success erases the phase-1 failure record.
//! Backfill never displaces a booked slot.
//!
//! The core is single-threaded: identical inputs produce byte-identical
//! output. Set-like inputs are stabilised to a defined order on intake.

mod candidates;
mod constraints;
mod metrics;
mod resources;
mod scoring;
mod state;

pub use candidates::CandidateGenerator;
pub use constraints::ConstraintChecker;
pub use metrics::{PriorityBand, ScheduleMetrics};
pub use resources::{EquipmentIndex, ResourceIndex, SpecialistIndex};
pub use scoring::SlotScorer;
pub use state::SchedulerState;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{
    Activity, BookedSlot, ClockTime, Equipment, FailureReason, Horizon, ScheduleResult, Specialist,
    TimeWindow, TravelPeriod,
};
use crate::validation::{validate_input, InputError};

/// Tunables for a scheduling run.
///
/// The defaults are part of the output contract: changing any of them
/// changes which slots win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// The schedulable day. Default 06:00-21:00.
    pub day_window: TimeWindow,
    /// Start-time grid step in minutes. Default 30.
    pub slot_granularity_minutes: u16,
    /// Validator-accepted candidates scored per occurrence. Default 32.
    pub candidate_cap: usize,
    /// A date with fewer bookings than this is a backfill target.
    /// Default 15.
    pub light_day_threshold: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_window: TimeWindow::new(ClockTime::new(6, 0), ClockTime::new(21, 0)),
            slot_granularity_minutes: 30,
            candidate_cap: 32,
            light_day_threshold: 15,
        }
    }
}

impl SchedulerConfig {
    /// Overrides the accepted-candidate cap.
    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = cap;
        self
    }

    /// Overrides the light-day threshold.
    pub fn with_light_day_threshold(mut self, threshold: usize) -> Self {
        self.light_day_threshold = threshold;
        self
    }
}

/// Input container for a scheduling run.
///
/// Construction stabilises set-like fields (equipment lists, off-days,
/// holidays) into a defined order so runs are reproducible regardless of
/// how callers assembled their collections.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Activities to place.
    pub activities: Vec<Activity>,
    /// Specialists referenced by the activities.
    pub specialists: Vec<Specialist>,
    /// Equipment referenced by the activities.
    pub equipment: Vec<Equipment>,
    /// Client travel periods.
    pub travel_periods: Vec<TravelPeriod>,
    /// Inclusive scheduling date range.
    pub horizon: Horizon,
    /// Run tunables.
    pub config: SchedulerConfig,
}

impl ScheduleRequest {
    /// Creates a request with no resources and default tunables.
    pub fn new(activities: Vec<Activity>, horizon: Horizon) -> Self {
        let mut activities = activities;
        for a in &mut activities {
            a.equipment_ids.sort();
            a.equipment_ids.dedup();
        }
        Self {
            activities,
            specialists: Vec::new(),
            equipment: Vec::new(),
            travel_periods: Vec::new(),
            horizon,
            config: SchedulerConfig::default(),
        }
    }

    /// Sets the specialists.
    pub fn with_specialists(mut self, mut specialists: Vec<Specialist>) -> Self {
        for s in &mut specialists {
            s.days_off.sort_unstable();
            s.days_off.dedup();
            s.holidays.sort_unstable();
            s.holidays.dedup();
        }
        self.specialists = specialists;
        self
    }

    /// Sets the equipment.
    pub fn with_equipment(mut self, equipment: Vec<Equipment>) -> Self {
        self.equipment = equipment;
        self
    }

    /// Sets the travel periods.
    pub fn with_travel_periods(mut self, travel_periods: Vec<TravelPeriod>) -> Self {
        self.travel_periods = travel_periods;
        self
    }

    /// Sets the tunables.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }
}

/// Validates a request and runs both phases.
///
/// This is the whole outward surface of the core: validated records in,
/// booked slots and a failure map out. Placement failures are data, not
/// errors; only malformed input returns `Err`.
pub fn schedule(request: &ScheduleRequest) -> Result<ScheduleResult, Vec<InputError>> {
    Ok(Scheduler::new(request)?.run())
}

/// The two-phase greedy scheduler for one run.
pub struct Scheduler<'a> {
    request: &'a ScheduleRequest,
    index: ResourceIndex<'a>,
}

impl<'a> Scheduler<'a> {
    /// Validates the request and builds the resource index.
    pub fn new(request: &'a ScheduleRequest) -> Result<Self, Vec<InputError>> {
        validate_input(
            &request.activities,
            &request.specialists,
            &request.equipment,
            &request.travel_periods,
            &request.horizon,
        )?;
        let index = ResourceIndex::build(
            &request.activities,
            &request.specialists,
            &request.equipment,
            &request.travel_periods,
            &request.horizon,
        );
        Ok(Self { request, index })
    }

    /// The resource index for this run.
    pub fn index(&self) -> &ResourceIndex<'a> {
        &self.index
    }

    /// Runs phase 1 then phase 2 to completion and returns the result.
    /// Never fails: unplaceable occurrences land in the failure map.
    pub fn run(&self) -> ScheduleResult {
        let mut state = SchedulerState::new();
        info!(
            activities = self.request.activities.len(),
            start = %self.request.horizon.start,
            end = %self.request.horizon.end,
            "starting scheduling run"
        );

        self.phase_one(&mut state);
        info!(slots = state.slots().len(), "phase 1 complete");

        let backfilled = self.phase_two(&mut state);
        info!(
            slots = state.slots().len(),
            backfilled,
            failed_occurrences = state.failed_activity_ids().iter().map(|id| state.failures_for(id).len()).sum::<usize>(),
            "phase 2 complete"
        );

        state.into_result()
    }

    /// Phase 1: priority-ordered greedy placement.
    fn phase_one(&self, state: &mut SchedulerState) {
        let checker = ConstraintChecker::new(&self.index, self.request.config.day_window);
        let scorer = SlotScorer::new(&self.index);

        let mut order: Vec<&Activity> = self.request.activities.iter().collect();
        order.sort_by(|a, b| {
            (a.priority, a.frequency.rank(), &a.id).cmp(&(b.priority, b.frequency.rank(), &b.id))
        });

        for activity in order {
            let required = self.index.required_occurrences(&activity.id);
            if required == 0 {
                // Horizon too short for even one occurrence
                state.record_failure(&activity.id, 0, FailureReason::NoCandidate);
                warn!(activity = %activity.id, "horizon admits no occurrences");
                continue;
            }

            let mut placed = 0usize;
            for occurrence in 0..required {
                let generator = CandidateGenerator::for_occurrence(
                    activity,
                    occurrence,
                    &self.request.horizon,
                    state,
                    &self.request.config,
                );
                match self.best_candidate(activity, generator, state, &checker, &scorer) {
                    Ok((date, start)) => {
                        self.book(activity, date, start, state);
                        placed += 1;
                    }
                    Err(reason) => {
                        state.record_failure(&activity.id, occurrence, reason);
                        debug!(activity = %activity.id, occurrence, %reason, "occurrence failed");
                    }
                }
            }

            if placed < required {
                warn!(
                    activity = %activity.id,
                    priority = activity.priority,
                    placed,
                    required,
                    "activity under-placed in phase 1"
                );
            }
        }
    }

    /// Phase 2: backfill failed occurrences onto light days. Returns the
    /// number of slots recovered.
    fn phase_two(&self, state: &mut SchedulerState) -> usize {
        let checker = ConstraintChecker::new(&self.index, self.request.config.day_window);
        let scorer = SlotScorer::new(&self.index);

        // Failed activities by (priority, missing occurrences desc, id)
        let mut failed: Vec<(&Activity, usize)> = state
            .failed_activity_ids()
            .iter()
            .filter_map(|id| self.index.activity(id))
            .map(|a| {
                let missing = self
                    .index
                    .required_occurrences(&a.id)
                    .saturating_sub(state.occurrence_count(&a.id));
                (a, missing)
            })
            .collect();
        failed.sort_by(|(a, ma), (b, mb)| {
            (a.priority, std::cmp::Reverse(*ma), &a.id).cmp(&(b.priority, std::cmp::Reverse(*mb), &b.id))
        });

        let mut backfilled = 0usize;
        for (activity, missing) in failed {
            // An activity can carry a failure record while demanding
            // nothing (horizon shorter than its period); never over-place
            if missing == 0 {
                continue;
            }
            let pending = state.failures_for(&activity.id).to_vec();
            for failure in pending.into_iter().take(missing) {
                // Day counts move as backfill lands, so re-derive the
                // light-day list before every attempt
                let light_days = self.light_days(state);
                if light_days.is_empty() {
                    break;
                }
                let generator =
                    CandidateGenerator::for_dates(activity, light_days, &self.request.config);
                match self.best_candidate(activity, generator, state, &checker, &scorer) {
                    Ok((date, start)) => {
                        self.book(activity, date, start, state);
                        state.clear_failure(&activity.id, failure.occurrence);
                        backfilled += 1;
                        debug!(activity = %activity.id, occurrence = failure.occurrence, %date, "backfilled");
                    }
                    // A miss would repeat identically: state only changes
                    // on success, so stop trying this activity
                    Err(_) => break,
                }
            }
        }
        backfilled
    }

    /// Walks a candidate generator, validating every candidate and
    /// scoring the first `candidate_cap` accepted ones. Returns the
    /// winning (date, start) or the failure reason for the occurrence.
    ///
    /// The walk never stops on rejections, so an acceptable candidate
    /// anywhere in the sequence is always found when one exists.
    fn best_candidate(
        &self,
        activity: &Activity,
        generator: CandidateGenerator,
        state: &SchedulerState,
        checker: &ConstraintChecker<'_>,
        scorer: &SlotScorer<'_>,
    ) -> Result<(NaiveDate, ClockTime), FailureReason> {
        let cap = self.request.config.candidate_cap.max(1);
        let mut last_rejection: Option<FailureReason> = None;
        let mut best: Option<(u32, NaiveDate, ClockTime, usize)> = None;
        let mut accepted = 0usize;

        for (position, (date, start)) in generator.enumerate() {
            match checker.check(activity, date, start, state) {
                Err(reason) => last_rejection = Some(reason),
                Ok(()) => {
                    let score = scorer.score(activity, date, start, state);
                    let challenger = (score, date, start, position);
                    let wins = match best {
                        None => true,
                        // Higher score, then earlier date, earlier start,
                        // earlier generation order
                        Some((s, d, t, p)) => {
                            score > s || (score == s && (date, start, position) < (d, t, p))
                        }
                    };
                    if wins {
                        best = Some(challenger);
                    }
                    accepted += 1;
                    if accepted >= cap {
                        break;
                    }
                }
            }
        }

        match best {
            Some((_, date, start, _)) => Ok((date, start)),
            None => Err(last_rejection.unwrap_or(FailureReason::NoCandidate)),
        }
    }

    /// Books a slot, binding the activity's required resources.
    fn book(&self, activity: &Activity, date: NaiveDate, start: ClockTime, state: &mut SchedulerState) {
        let slot = BookedSlot {
            activity_id: activity.id.clone(),
            date,
            start,
            duration_minutes: activity.duration_minutes,
            specialist_id: activity.specialist_id.clone(),
            equipment_ids: activity.equipment_ids.clone(),
        };
        debug!(activity = %activity.id, %date, %start, "booked");
        state.book(slot);
    }

    /// Dates carrying fewer than `light_day_threshold` bookings, lightest
    /// first (ties by date).
    fn light_days(&self, state: &SchedulerState) -> Vec<NaiveDate> {
        let threshold = self.request.config.light_day_threshold;
        let mut days: Vec<NaiveDate> = self
            .request
            .horizon
            .iter_dates()
            .filter(|&d| state.booked_count(d) < threshold)
            .collect();
        // Stable, so equal counts stay in date order
        days.sort_by_key(|&d| state.booked_count(d));
        days
    }
}
