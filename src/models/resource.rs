//! Resource models: specialists, equipment, and travel periods.
//!
//! Resources constrain where activity occurrences may land. Activities
//! reference specialists and equipment by identity only; the scheduler
//! resolves identities through its resource index at the point of use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::{ranges_overlap, ClockTime};

/// Discipline of a healthcare professional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialistType {
    Trainer,
    Dietitian,
    Therapist,
    Physician,
    #[serde(rename = "Allied_Health")]
    AlliedHealth,
}

/// A weekly recurring block when a specialist is available.
///
/// `weekday` is 0 (Monday) through 6 (Sunday). The clock range is
/// half-open `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    /// Day of week (0 = Monday, 6 = Sunday).
    pub weekday: u8,
    /// Block start.
    pub start: ClockTime,
    /// Block end.
    pub end: ClockTime,
}

impl AvailabilityBlock {
    /// Creates an availability block.
    pub const fn new(weekday: u8, start: ClockTime, end: ClockTime) -> Self {
        Self { weekday, start, end }
    }
}

/// A healthcare professional with weekly availability and time off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialist {
    /// Unique specialist identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Discipline.
    #[serde(rename = "type")]
    pub specialist_type: SpecialistType,
    /// Weekly recurring availability blocks.
    pub availability: Vec<AvailabilityBlock>,
    /// Weekdays entirely off (0 = Monday, 6 = Sunday).
    #[serde(default)]
    pub days_off: Vec<u8>,
    /// Specific dates unavailable.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl Specialist {
    /// Creates a specialist with no availability; add blocks with
    /// [`with_block`](Self::with_block).
    pub fn new(id: impl Into<String>, specialist_type: SpecialistType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            specialist_type,
            availability: Vec::new(),
            days_off: Vec::new(),
            holidays: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a weekly availability block.
    pub fn with_block(mut self, weekday: u8, start: ClockTime, end: ClockTime) -> Self {
        self.availability.push(AvailabilityBlock::new(weekday, start, end));
        self
    }

    /// Marks a weekday entirely off.
    pub fn with_day_off(mut self, weekday: u8) -> Self {
        self.days_off.push(weekday);
        self
    }

    /// Adds a holiday date.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.push(date);
        self
    }
}

/// A period when a piece of equipment is out of service.
///
/// Covers every date in `[start_date, end_date]`; on each covered date
/// the clock range `[start, end)` is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    /// First affected date.
    pub start_date: NaiveDate,
    /// Last affected date (inclusive).
    pub end_date: NaiveDate,
    /// Daily blocked range start.
    pub start: ClockTime,
    /// Daily blocked range end.
    pub end: ClockTime,
}

impl MaintenanceWindow {
    /// Creates a maintenance window.
    pub const fn new(start_date: NaiveDate, end_date: NaiveDate, start: ClockTime, end: ClockTime) -> Self {
        Self { start_date, end_date, start, end }
    }

    /// Whether this window covers `date`.
    #[inline]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether this window blocks the clock range `[start, end)` on `date`.
    pub fn blocks(&self, date: NaiveDate, start: ClockTime, end: ClockTime) -> bool {
        self.covers(date) && ranges_overlap(self.start, self.end, start, end)
    }
}

/// A physical resource with scheduled maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique equipment identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Periods when the equipment is out of service.
    #[serde(default)]
    pub maintenance_windows: Vec<MaintenanceWindow>,
}

impl Equipment {
    /// Creates equipment with no maintenance windows.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            maintenance_windows: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a maintenance window.
    pub fn with_maintenance(mut self, window: MaintenanceWindow) -> Self {
        self.maintenance_windows.push(window);
        self
    }
}

/// A date range when the client is away.
///
/// When `remote_allowed` is true, remote-capable activities may continue
/// during the trip; otherwise no activities are schedulable on covered
/// dates. Non-remote activities are never schedulable during travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPeriod {
    /// First travel date.
    pub start_date: NaiveDate,
    /// Last travel date (inclusive).
    pub end_date: NaiveDate,
    /// Destination, for presentation only.
    #[serde(default)]
    pub location: String,
    /// Whether remote-capable activities may continue during the trip.
    #[serde(default)]
    pub remote_allowed: bool,
}

impl TravelPeriod {
    /// Creates a travel period that allows remote activities to continue.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            location: String::new(),
            remote_allowed: true,
        }
    }

    /// Sets the destination label.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Blocks all activities, remote-capable or not, during the trip.
    pub fn blocking_all(mut self) -> Self {
        self.remote_allowed = false;
        self
    }

    /// Whether this period covers `date`.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
