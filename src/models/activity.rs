//! Activity and frequency models.
//!
//! An activity is a recurring health task: it has a priority, a recurrence
//! frequency, a duration, an optional preferred clock window, and optional
//! resource requirements (a specialist and/or equipment). The scheduler
//! expands each activity into the occurrences its frequency demands over
//! the horizon and places each occurrence independently.

use serde::{Deserialize, Serialize};

use super::time::{ClockTime, Horizon, TimeWindow};

/// Type of health activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    Medication,
    Fitness,
    Food,
    Therapy,
    Consultation,
}

/// Where an activity takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Home,
    Gym,
    Clinic,
    Any,
}

/// How often an activity recurs.
///
/// The `Weekly` preferred-day list uses weekday indices 0 (Monday)
/// through 6 (Sunday); an empty list falls back to cycling Monday-Friday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pattern")]
pub enum Frequency {
    /// Once per calendar day over the horizon.
    Daily,
    /// `count` times per week, optionally on preferred weekdays.
    Weekly {
        count: u8,
        #[serde(default)]
        preferred_days: Vec<u8>,
    },
    /// `count` times per calendar month.
    Monthly { count: u8 },
    /// Once every `interval_days` days.
    Custom { interval_days: u16 },
}

impl Frequency {
    /// Ordering rank used by the phase-1 global sort: more frequent
    /// patterns schedule first. Daily < Weekly < Monthly < Custom.
    pub fn rank(&self) -> u8 {
        match self {
            Frequency::Daily => 0,
            Frequency::Weekly { .. } => 1,
            Frequency::Monthly { .. } => 2,
            Frequency::Custom { .. } => 3,
        }
    }

    /// Total occurrences this frequency demands over a horizon of
    /// `H = horizon.days()` days:
    ///
    /// - Daily: `H`
    /// - Weekly with count `c`: `c * (H / 7)` (partial trailing week ignored)
    /// - Monthly with count `c`: `c * months-covered`
    /// - Custom with interval `i`: `(H - 1) / i + 1`
    pub fn required_occurrences(&self, horizon: &Horizon) -> usize {
        let days = horizon.days().max(0) as usize;
        if days == 0 {
            return 0;
        }
        match self {
            Frequency::Daily => days,
            Frequency::Weekly { count, .. } => *count as usize * (days / 7),
            Frequency::Monthly { count } => *count as usize * horizon.months_covered().len(),
            Frequency::Custom { interval_days } => (days - 1) / (*interval_days).max(1) as usize + 1,
        }
    }
}

/// A recurring health task to be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Activity classification.
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Priority 1 (critical) through 5 (optional).
    pub priority: u8,
    /// Recurrence pattern.
    pub frequency: Frequency,
    /// Duration in minutes (5-480).
    pub duration_minutes: u16,
    /// Preferred clock window; `None` = anywhere in the schedulable day.
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    /// Required specialist, by identity.
    #[serde(default)]
    pub specialist_id: Option<String>,
    /// Required equipment, by identity.
    #[serde(default)]
    pub equipment_ids: Vec<String>,
    /// Where the activity takes place.
    pub location: Location,
    /// Whether the activity can be done remotely (e.g. video call).
    #[serde(default)]
    pub remote_capable: bool,
    /// Free-form presentation text; the scheduler never inspects it.
    #[serde(default)]
    pub details: String,
}

impl Activity {
    /// Creates an activity with a middle priority, daily frequency, and a
    /// 30-minute duration; adjust with the builder methods.
    pub fn new(id: impl Into<String>, activity_type: ActivityType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            activity_type,
            priority: 3,
            frequency: Frequency::Daily,
            duration_minutes: 30,
            time_window: None,
            specialist_id: None,
            equipment_ids: Vec::new(),
            location: Location::Any,
            remote_capable: false,
            details: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the priority (1 = critical, 5 = optional).
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the recurrence frequency.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the duration in minutes.
    pub fn with_duration(mut self, minutes: u16) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Sets the preferred clock window.
    pub fn with_time_window(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.time_window = Some(TimeWindow::new(start, end));
        self
    }

    /// Requires a specialist.
    pub fn with_specialist(mut self, specialist_id: impl Into<String>) -> Self {
        self.specialist_id = Some(specialist_id.into());
        self
    }

    /// Adds a required equipment item.
    pub fn with_equipment(mut self, equipment_id: impl Into<String>) -> Self {
        self.equipment_ids.push(equipment_id.into());
        self
    }

    /// Sets the location tag.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Marks the activity as remote-capable.
    pub fn remote_capable(mut self) -> Self {
        self.remote_capable = true;
        self
    }

    /// Sets the presentation details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// End clock of a slot starting at `start`.
    #[inline]
    pub fn end_for(&self, start: ClockTime) -> ClockTime {
        start.plus_minutes(self.duration_minutes)
    }
}
