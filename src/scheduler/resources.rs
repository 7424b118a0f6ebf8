//! Resource index: O(1) lookups for the hot validation loop.
//!
//! Built once per run from the validated input records. Precomputes per
//! specialist a per-weekday list of availability windows, an off-weekday
//! bitmap, and a holiday set; sorts equipment maintenance windows and
//! travel periods into a stable order; and caches each activity's required
//! occurrence count. Lookups are side-effect free and stable across calls.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::time::weekday_index;
use crate::models::{
    Activity, ClockTime, Equipment, Horizon, MaintenanceWindow, Specialist, TimeWindow, TravelPeriod,
};

/// Precomputed availability view of one specialist.
#[derive(Debug)]
pub struct SpecialistIndex<'a> {
    /// The underlying record.
    pub specialist: &'a Specialist,
    /// Availability windows bucketed by weekday, sorted by start.
    blocks_by_weekday: [Vec<TimeWindow>; 7],
    /// Weekdays entirely off.
    days_off: [bool; 7],
    /// Specific dates unavailable.
    holidays: HashSet<NaiveDate>,
}

impl<'a> SpecialistIndex<'a> {
    fn build(specialist: &'a Specialist) -> Self {
        let mut blocks_by_weekday: [Vec<TimeWindow>; 7] = std::array::from_fn(|_| Vec::new());
        for block in &specialist.availability {
            if let Some(bucket) = blocks_by_weekday.get_mut(block.weekday as usize) {
                bucket.push(TimeWindow::new(block.start, block.end));
            }
        }
        for bucket in &mut blocks_by_weekday {
            bucket.sort_by_key(|w| (w.start, w.end));
        }

        let mut days_off = [false; 7];
        for &day in &specialist.days_off {
            if let Some(flag) = days_off.get_mut(day as usize) {
                *flag = true;
            }
        }

        Self {
            specialist,
            blocks_by_weekday,
            days_off,
            holidays: specialist.holidays.iter().copied().collect(),
        }
    }

    /// Whether the specialist is entirely unavailable on `date`
    /// (holiday or recurring day off).
    pub fn is_off(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date) || self.days_off[weekday_index(date) as usize]
    }

    /// Availability windows on the weekday of `date`, sorted by start.
    pub fn blocks_on(&self, date: NaiveDate) -> &[TimeWindow] {
        &self.blocks_by_weekday[weekday_index(date) as usize]
    }

    /// Whether some availability window on `date`'s weekday encloses
    /// the clock range `[start, end)`.
    pub fn covers(&self, date: NaiveDate, start: ClockTime, end: ClockTime) -> bool {
        self.blocks_on(date).iter().any(|w| w.encloses(start, end))
    }
}

/// Precomputed view of one equipment item.
#[derive(Debug)]
pub struct EquipmentIndex<'a> {
    /// The underlying record.
    pub equipment: &'a Equipment,
    /// Maintenance windows sorted by (start date, start clock).
    windows: Vec<MaintenanceWindow>,
}

impl<'a> EquipmentIndex<'a> {
    fn build(equipment: &'a Equipment) -> Self {
        let mut windows = equipment.maintenance_windows.clone();
        windows.sort_by_key(|w| (w.start_date, w.start, w.end_date, w.end));
        Self { equipment, windows }
    }

    /// Maintenance windows in stable order.
    pub fn maintenance_windows(&self) -> &[MaintenanceWindow] {
        &self.windows
    }
}

/// Lookup tables for a single scheduling run.
///
/// Owns no records; borrows the validated inputs for the run's lifetime.
#[derive(Debug)]
pub struct ResourceIndex<'a> {
    specialists: HashMap<&'a str, SpecialistIndex<'a>>,
    equipment: HashMap<&'a str, EquipmentIndex<'a>>,
    /// Travel periods sorted by (start, end).
    travel: Vec<&'a TravelPeriod>,
    activities: HashMap<&'a str, &'a Activity>,
    required: HashMap<&'a str, usize>,
}

impl<'a> ResourceIndex<'a> {
    /// Builds the index for one run.
    pub fn build(
        activities: &'a [Activity],
        specialists: &'a [Specialist],
        equipment: &'a [Equipment],
        travel_periods: &'a [TravelPeriod],
        horizon: &Horizon,
    ) -> Self {
        let specialists = specialists
            .iter()
            .map(|s| (s.id.as_str(), SpecialistIndex::build(s)))
            .collect();

        let equipment = equipment
            .iter()
            .map(|e| (e.id.as_str(), EquipmentIndex::build(e)))
            .collect();

        let mut travel: Vec<&TravelPeriod> = travel_periods.iter().collect();
        travel.sort_by_key(|t| (t.start_date, t.end_date));

        let activity_map: HashMap<&str, &Activity> =
            activities.iter().map(|a| (a.id.as_str(), a)).collect();

        let required = activities
            .iter()
            .map(|a| (a.id.as_str(), a.frequency.required_occurrences(horizon)))
            .collect();

        Self {
            specialists,
            equipment,
            travel,
            activities: activity_map,
            required,
        }
    }

    /// Looks up a specialist by identity.
    pub fn specialist(&self, id: &str) -> Option<&SpecialistIndex<'a>> {
        self.specialists.get(id)
    }

    /// Looks up an equipment item by identity.
    pub fn equipment(&self, id: &str) -> Option<&EquipmentIndex<'a>> {
        self.equipment.get(id)
    }

    /// Looks up an activity by identity.
    pub fn activity(&self, id: &str) -> Option<&'a Activity> {
        self.activities.get(id).copied()
    }

    /// Travel periods covering `date`, in stable order.
    pub fn travel_covering(&self, date: NaiveDate) -> impl Iterator<Item = &'a TravelPeriod> + '_ {
        self.travel.iter().copied().filter(move |t| t.contains(date))
    }

    /// Cached required occurrence count for an activity.
    pub fn required_occurrences(&self, activity_id: &str) -> usize {
        self.required.get(activity_id).copied().unwrap_or(0)
    }
}
