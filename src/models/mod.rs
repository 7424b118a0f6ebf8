//! Scheduling domain models.
//!
//! Core data types for describing a health program (activities and the
//! resources they depend on) and the scheduler's output (booked slots and
//! placement failures). All records are immutable once validated; the
//! scheduler consumes them by shared reference.

mod activity;
mod resource;
mod slot;
pub mod time;

pub use activity::{Activity, ActivityType, Frequency, Location};
pub use resource::{AvailabilityBlock, Equipment, MaintenanceWindow, Specialist, SpecialistType, TravelPeriod};
pub use slot::{BookedSlot, FailureReason, PlacementFailure, ScheduleResult};
pub use time::{ClockTime, Horizon, TimeWindow};
