//! Shared fixtures: the universal output invariants every run must hold.

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::NaiveDate;
use vita_schedule::models::time::weekday_index;
use vita_schedule::models::{Activity, Equipment, ScheduleResult, Specialist};
use vita_schedule::scheduler::ScheduleRequest;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Asserts the universal invariants over a run's output: day bounds,
/// window compliance, travel compliance, specialist availability,
/// equipment maintenance, and pairwise same-day overlap freedom
/// (calendar, specialist, and equipment).
pub fn assert_invariants(request: &ScheduleRequest, result: &ScheduleResult) {
    let activities: HashMap<&str, &Activity> = request
        .activities
        .iter()
        .map(|a| (a.id.as_str(), a))
        .collect();
    let specialists: HashMap<&str, &Specialist> = request
        .specialists
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();
    let equipment: HashMap<&str, &Equipment> = request
        .equipment
        .iter()
        .map(|e| (e.id.as_str(), e))
        .collect();
    let day = request.config.day_window;

    for (i, slot) in result.slots.iter().enumerate() {
        let activity = activities
            .get(slot.activity_id.as_str())
            .unwrap_or_else(|| panic!("slot references unknown activity {}", slot.activity_id));
        let end = slot.end();

        // Day bounds
        assert!(
            day.start <= slot.start && end <= day.end,
            "slot for {} on {} at {} escapes the schedulable day",
            slot.activity_id,
            slot.date,
            slot.start
        );

        // Time-window compliance
        if let Some(window) = &activity.time_window {
            assert!(
                window.encloses(slot.start, end),
                "slot for {} on {} at {} escapes its window",
                slot.activity_id,
                slot.date,
                slot.start
            );
        }

        // Travel compliance
        if !activity.remote_capable {
            assert!(
                request.travel_periods.iter().all(|t| !t.contains(slot.date)),
                "non-remote {} booked on travel date {}",
                slot.activity_id,
                slot.date
            );
        }

        // Specialist availability
        if let Some(sid) = &slot.specialist_id {
            let sp = specialists
                .get(sid.as_str())
                .unwrap_or_else(|| panic!("slot references unknown specialist {sid}"));
            let weekday = weekday_index(slot.date);
            assert!(!sp.holidays.contains(&slot.date), "{sid} booked on a holiday");
            assert!(!sp.days_off.contains(&weekday), "{sid} booked on a day off");
            assert!(
                sp.availability
                    .iter()
                    .any(|b| b.weekday == weekday && b.start <= slot.start && end <= b.end),
                "{sid} booked outside every availability block on {}",
                slot.date
            );
        }

        // Equipment maintenance
        for eid in &slot.equipment_ids {
            let eq = equipment
                .get(eid.as_str())
                .unwrap_or_else(|| panic!("slot references unknown equipment {eid}"));
            assert!(
                eq.maintenance_windows
                    .iter()
                    .all(|w| !w.blocks(slot.date, slot.start, end)),
                "{eid} booked during maintenance on {}",
                slot.date
            );
        }

        // Same-day overlap freedom; specialist and equipment
        // double-booking are special cases of the same check
        for other in &result.slots[i + 1..] {
            if slot.date == other.date {
                assert!(
                    !slot.clock_overlaps(other.start, other.end()),
                    "{} and {} overlap on {}",
                    slot.activity_id,
                    other.activity_id,
                    slot.date
                );
            }
        }
    }
}
