//! Input validation for scheduling runs.
//!
//! Checks structural integrity of activities, resources, and the horizon
//! before the scheduler runs. Detects:
//! - Duplicate IDs
//! - Field values outside their documented ranges
//! - Dangling specialist/equipment references
//! - Overlapping specialist availability blocks
//! - Inverted date or clock ranges
//!
//! Every violation is reported (not first-fail); the scheduler refuses to
//! run with a non-empty error list. Placement failures during scheduling
//! are a separate, non-error channel.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Activity, ClockTime, Equipment, Frequency, Horizon, Specialist, TravelPeriod};

/// Validation result: `Ok(())` or every detected issue.
pub type ValidationResult = Result<(), Vec<InputError>>;

/// A malformed-input error, carrying the offending identifier and field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("duplicate {entity} id '{id}'")]
    DuplicateId { entity: &'static str, id: String },
    #[error("activity '{id}': priority {value} outside 1-5")]
    PriorityOutOfRange { id: String, value: u8 },
    #[error("activity '{id}': duration {value} minutes outside 5-480")]
    DurationOutOfRange { id: String, value: u16 },
    #[error("activity '{id}': time window end {end} not after start {start}")]
    EmptyTimeWindow { id: String, start: ClockTime, end: ClockTime },
    #[error("activity '{id}': {field} {value} outside {min}-{max}")]
    FrequencyOutOfRange {
        id: String,
        field: &'static str,
        value: u16,
        min: u16,
        max: u16,
    },
    #[error("activity '{id}': references unknown specialist '{specialist_id}'")]
    UnknownSpecialist { id: String, specialist_id: String },
    #[error("activity '{id}': references unknown equipment '{equipment_id}'")]
    UnknownEquipment { id: String, equipment_id: String },
    #[error("specialist '{id}': availability block end {end} not after start {start}")]
    EmptyAvailabilityBlock { id: String, start: ClockTime, end: ClockTime },
    #[error("specialist '{id}': overlapping availability blocks on weekday {weekday}")]
    OverlappingAvailability { id: String, weekday: u8 },
    #[error("{entity} '{id}': weekday {value} outside 0-6")]
    WeekdayOutOfRange {
        entity: &'static str,
        id: String,
        value: u8,
    },
    #[error("equipment '{id}': maintenance window ends before it starts")]
    InvalidMaintenanceWindow { id: String },
    #[error("travel period starting {start} ends before it starts")]
    InvalidTravelPeriod { start: NaiveDate },
    #[error("horizon end {end} precedes start {start}")]
    InvalidHorizon { start: NaiveDate, end: NaiveDate },
}

/// Validates all inputs for a scheduling run.
///
/// # Checks
/// 1. Horizon end does not precede its start
/// 2. No duplicate activity, specialist, or equipment IDs
/// 3. Activity fields within range (priority, duration, window, frequency)
/// 4. All specialist/equipment references resolve
/// 5. Specialist availability blocks are non-empty and non-overlapping
///    per weekday; weekday fields within 0-6
/// 6. Maintenance windows and travel periods are not inverted
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    activities: &[Activity],
    specialists: &[Specialist],
    equipment: &[Equipment],
    travel_periods: &[TravelPeriod],
    horizon: &Horizon,
) -> ValidationResult {
    let mut errors = Vec::new();

    if horizon.end < horizon.start {
        errors.push(InputError::InvalidHorizon {
            start: horizon.start,
            end: horizon.end,
        });
    }

    let mut specialist_ids = HashSet::new();
    for s in specialists {
        if !specialist_ids.insert(s.id.as_str()) {
            errors.push(InputError::DuplicateId {
                entity: "specialist",
                id: s.id.clone(),
            });
        }
        check_specialist(s, &mut errors);
    }

    let mut equipment_ids = HashSet::new();
    for e in equipment {
        if !equipment_ids.insert(e.id.as_str()) {
            errors.push(InputError::DuplicateId {
                entity: "equipment",
                id: e.id.clone(),
            });
        }
        for mw in &e.maintenance_windows {
            if mw.end_date < mw.start_date || mw.end < mw.start {
                errors.push(InputError::InvalidMaintenanceWindow { id: e.id.clone() });
            }
        }
    }

    let mut activity_ids = HashSet::new();
    for a in activities {
        if !activity_ids.insert(a.id.as_str()) {
            errors.push(InputError::DuplicateId {
                entity: "activity",
                id: a.id.clone(),
            });
        }
        check_activity(a, &specialist_ids, &equipment_ids, &mut errors);
    }

    for t in travel_periods {
        if t.end_date < t.start_date {
            errors.push(InputError::InvalidTravelPeriod { start: t.start_date });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_activity(
    a: &Activity,
    specialist_ids: &HashSet<&str>,
    equipment_ids: &HashSet<&str>,
    errors: &mut Vec<InputError>,
) {
    if !(1..=5).contains(&a.priority) {
        errors.push(InputError::PriorityOutOfRange {
            id: a.id.clone(),
            value: a.priority,
        });
    }

    if !(5..=480).contains(&a.duration_minutes) {
        errors.push(InputError::DurationOutOfRange {
            id: a.id.clone(),
            value: a.duration_minutes,
        });
    }

    if let Some(window) = &a.time_window {
        if window.end <= window.start {
            errors.push(InputError::EmptyTimeWindow {
                id: a.id.clone(),
                start: window.start,
                end: window.end,
            });
        }
    }

    match &a.frequency {
        Frequency::Daily => {}
        Frequency::Weekly { count, preferred_days } => {
            if !(1..=7).contains(count) {
                errors.push(InputError::FrequencyOutOfRange {
                    id: a.id.clone(),
                    field: "weekly count",
                    value: *count as u16,
                    min: 1,
                    max: 7,
                });
            }
            for &day in preferred_days {
                if day > 6 {
                    errors.push(InputError::WeekdayOutOfRange {
                        entity: "activity",
                        id: a.id.clone(),
                        value: day,
                    });
                }
            }
        }
        Frequency::Monthly { count } => {
            if !(1..=31).contains(count) {
                errors.push(InputError::FrequencyOutOfRange {
                    id: a.id.clone(),
                    field: "monthly count",
                    value: *count as u16,
                    min: 1,
                    max: 31,
                });
            }
        }
        Frequency::Custom { interval_days } => {
            if *interval_days < 1 {
                errors.push(InputError::FrequencyOutOfRange {
                    id: a.id.clone(),
                    field: "interval_days",
                    value: *interval_days,
                    min: 1,
                    max: u16::MAX,
                });
            }
        }
    }

    if let Some(sid) = &a.specialist_id {
        if !specialist_ids.contains(sid.as_str()) {
            errors.push(InputError::UnknownSpecialist {
                id: a.id.clone(),
                specialist_id: sid.clone(),
            });
        }
    }

    for eid in &a.equipment_ids {
        if !equipment_ids.contains(eid.as_str()) {
            errors.push(InputError::UnknownEquipment {
                id: a.id.clone(),
                equipment_id: eid.clone(),
            });
        }
    }
}

fn check_specialist(s: &Specialist, errors: &mut Vec<InputError>) {
    for block in &s.availability {
        if block.weekday > 6 {
            errors.push(InputError::WeekdayOutOfRange {
                entity: "specialist",
                id: s.id.clone(),
                value: block.weekday,
            });
        }
        if block.end <= block.start {
            errors.push(InputError::EmptyAvailabilityBlock {
                id: s.id.clone(),
                start: block.start,
                end: block.end,
            });
        }
    }

    for &day in &s.days_off {
        if day > 6 {
            errors.push(InputError::WeekdayOutOfRange {
                entity: "specialist",
                id: s.id.clone(),
                value: day,
            });
        }
    }

    // Same-weekday blocks must not overlap (half-open comparison after
    // sorting by start)
    for weekday in 0..=6u8 {
        let mut blocks: Vec<_> = s
            .availability
            .iter()
            .filter(|b| b.weekday == weekday)
            .collect();
        blocks.sort_by_key(|b| b.start);
        if blocks.windows(2).any(|w| w[1].start < w[0].end) {
            errors.push(InputError::OverlappingAvailability {
                id: s.id.clone(),
                weekday,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityType, MaintenanceWindow, SpecialistType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn horizon() -> Horizon {
        Horizon::new(date(2025, 3, 3), date(2025, 3, 30))
    }

    fn valid_specialist() -> Specialist {
        Specialist::new("spec_001", SpecialistType::Physician)
            .with_block(0, ClockTime::new(8, 0), ClockTime::new(12, 0))
    }

    #[test]
    fn test_valid_input() {
        let activities = vec![Activity::new("a1", ActivityType::Medication).with_priority(1)];
        assert!(validate_input(&activities, &[], &[], &[], &horizon()).is_ok());
    }

    #[test]
    fn test_duplicate_activity_id() {
        let activities = vec![
            Activity::new("a1", ActivityType::Fitness),
            Activity::new("a1", ActivityType::Food),
        ];
        let errors = validate_input(&activities, &[], &[], &[], &horizon()).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, InputError::DuplicateId { entity: "activity", .. })));
    }

    #[test]
    fn test_priority_and_duration_range() {
        let activities = vec![
            Activity::new("a1", ActivityType::Fitness).with_priority(0),
            Activity::new("a2", ActivityType::Fitness).with_priority(6),
            Activity::new("a3", ActivityType::Fitness).with_duration(4),
            Activity::new("a4", ActivityType::Fitness).with_duration(481),
        ];
        let errors = validate_input(&activities, &[], &[], &[], &horizon()).unwrap_err();
        assert_eq!(
            errors.iter().filter(|e| matches!(e, InputError::PriorityOutOfRange { .. })).count(),
            2
        );
        assert_eq!(
            errors.iter().filter(|e| matches!(e, InputError::DurationOutOfRange { .. })).count(),
            2
        );
    }

    #[test]
    fn test_inverted_time_window() {
        let activities = vec![Activity::new("a1", ActivityType::Therapy)
            .with_time_window(ClockTime::new(10, 0), ClockTime::new(9, 0))];
        let errors = validate_input(&activities, &[], &[], &[], &horizon()).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, InputError::EmptyTimeWindow { .. })));
    }

    #[test]
    fn test_frequency_ranges() {
        let activities = vec![
            Activity::new("a1", ActivityType::Fitness)
                .with_frequency(Frequency::Weekly { count: 8, preferred_days: vec![] }),
            Activity::new("a2", ActivityType::Fitness)
                .with_frequency(Frequency::Weekly { count: 2, preferred_days: vec![7] }),
            Activity::new("a3", ActivityType::Fitness)
                .with_frequency(Frequency::Monthly { count: 32 }),
            Activity::new("a4", ActivityType::Fitness)
                .with_frequency(Frequency::Custom { interval_days: 0 }),
        ];
        let errors = validate_input(&activities, &[], &[], &[], &horizon()).unwrap_err();
        assert_eq!(
            errors.iter().filter(|e| matches!(e, InputError::FrequencyOutOfRange { .. })).count(),
            3
        );
        assert!(errors.iter().any(|e| matches!(e, InputError::WeekdayOutOfRange { .. })));
    }

    #[test]
    fn test_dangling_references() {
        let activities = vec![Activity::new("a1", ActivityType::Consultation)
            .with_specialist("ghost")
            .with_equipment("phantom")];
        let errors = validate_input(&activities, &[valid_specialist()], &[], &[], &horizon()).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, InputError::UnknownSpecialist { .. })));
        assert!(errors.iter().any(|e| matches!(e, InputError::UnknownEquipment { .. })));
    }

    #[test]
    fn test_overlapping_availability_blocks() {
        let s = Specialist::new("spec_001", SpecialistType::Trainer)
            .with_block(0, ClockTime::new(8, 0), ClockTime::new(12, 0))
            .with_block(0, ClockTime::new(11, 0), ClockTime::new(15, 0));
        let errors = validate_input(&[], &[s], &[], &[], &horizon()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, InputError::OverlappingAvailability { weekday: 0, .. })));
    }

    #[test]
    fn test_touching_availability_blocks_ok() {
        let s = Specialist::new("spec_001", SpecialistType::Trainer)
            .with_block(0, ClockTime::new(8, 0), ClockTime::new(12, 0))
            .with_block(0, ClockTime::new(12, 0), ClockTime::new(15, 0));
        assert!(validate_input(&[], &[s], &[], &[], &horizon()).is_ok());
    }

    #[test]
    fn test_zero_availability_is_valid() {
        // A specialist with no blocks is well-formed input; every
        // occurrence requiring them fails at scheduling time instead.
        let s = Specialist::new("spec_001", SpecialistType::Trainer);
        assert!(validate_input(&[], &[s], &[], &[], &horizon()).is_ok());
    }

    #[test]
    fn test_inverted_maintenance_and_travel() {
        let e = Equipment::new("eq1").with_maintenance(MaintenanceWindow::new(
            date(2025, 3, 10),
            date(2025, 3, 9),
            ClockTime::new(8, 0),
            ClockTime::new(10, 0),
        ));
        let t = TravelPeriod::new(date(2025, 3, 20), date(2025, 3, 19));
        let errors = validate_input(&[], &[], &[e], &[t], &horizon()).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, InputError::InvalidMaintenanceWindow { .. })));
        assert!(errors.iter().any(|e| matches!(e, InputError::InvalidTravelPeriod { .. })));
    }

    #[test]
    fn test_inverted_horizon() {
        let h = Horizon::new(date(2025, 3, 10), date(2025, 3, 9));
        let errors = validate_input(&[], &[], &[], &[], &h).unwrap_err();
        assert_eq!(errors, vec![InputError::InvalidHorizon { start: h.start, end: h.end }]);
    }
}
