//! Deterministic scheduling for recurring health activities.
//!
//! Turns a set of recurring activities (medication, fitness, meals,
//! therapy, consultations) plus their resource constraints (specialist
//! availability, equipment maintenance, client travel) into a concrete
//! day-by-day placement over a multi-week horizon.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Activity`, `Frequency`, `Specialist`,
//!   `Equipment`, `TravelPeriod`, `BookedSlot`, `ScheduleResult`
//! - **`validation`**: Input integrity checks (duplicate IDs, range
//!   violations, dangling references)
//! - **`scheduler`**: The two-phase core — hard-constraint validation,
//!   soft-constraint scoring, candidate generation with flexible-week
//!   fallback, greedy placement, and light-day backfill
//!
//! # Guarantees
//!
//! Booked slots never violate a hard constraint. Occurrences that cannot
//! be placed are reported with a categorical reason, never raised as
//! errors. The core is single-threaded and deterministic: identical
//! inputs produce byte-identical output.
//!
//! # Example
//!
//! ```
//! use vita_schedule::models::{Activity, ActivityType, ClockTime, Horizon};
//! use vita_schedule::scheduler::{schedule, ScheduleRequest};
//!
//! let start = chrono::NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let horizon = Horizon::new(start, start + chrono::Days::new(6));
//!
//! let meds = Activity::new("act_001", ActivityType::Medication)
//!     .with_name("Morning blood pressure medication")
//!     .with_priority(1)
//!     .with_duration(5)
//!     .with_time_window(ClockTime::new(6, 0), ClockTime::new(8, 0));
//!
//! let result = schedule(&ScheduleRequest::new(vec![meds], horizon)).unwrap();
//! assert_eq!(result.slot_count(), 7);
//! ```

pub mod models;
pub mod scheduler;
pub mod validation;
