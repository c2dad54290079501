//! # Time Slots
//!
//! Fixed-interval slot generation for the TIME step.
//!
//! ```text
//! generate_time_slots(9, 18, 15)
//!
//!   09 │ 09:00  09:15  09:30  09:45
//!   10 │ 10:00  10:15  10:30  10:45
//!   .. │ ...
//!   18 │ 18:00  18:15  18:30  18:45
//!
//!   10 buckets (hours 9-18 inclusive) × 4 slots
//! ```
//!
//! Generation is deterministic and cheap; callers recompute instead of
//! caching.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{parse_slot, validate_hour_range, validate_slot_interval, ValidationResult};
use crate::{DEFAULT_CLOSING_HOUR, DEFAULT_OPENING_HOUR, SLOT_INTERVAL_MINUTES};

/// All slots that start within one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SlotBucket {
    pub hour: u32,
    pub slots: Vec<String>,
}

/// Generates one bucket per hour in `[start_hour, end_hour]`, each holding
/// every "HH:MM" at `interval_minutes`.
///
/// A zero interval or `start_hour > end_hour` yields no buckets.
pub fn generate_time_slots(start_hour: u32, end_hour: u32, interval_minutes: u32) -> Vec<SlotBucket> {
    if interval_minutes == 0 || start_hour > end_hour {
        return Vec::new();
    }

    (start_hour..=end_hour)
        .map(|hour| SlotBucket {
            hour,
            slots: (0..60)
                .step_by(interval_minutes as usize)
                .map(|minute| format!("{:02}:{:02}", hour, minute))
                .collect(),
        })
        .collect()
}

/// A validated opening-hours/interval configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    start_hour: u32,
    end_hour: u32,
    interval_minutes: u32,
}

impl SlotSchedule {
    /// Creates a schedule, rejecting hours outside 0..=23, an inverted
    /// range, or an interval outside 1..=60.
    pub fn new(start_hour: u32, end_hour: u32, interval_minutes: u32) -> ValidationResult<Self> {
        validate_hour_range(start_hour, end_hour)?;
        validate_slot_interval(interval_minutes)?;
        Ok(SlotSchedule {
            start_hour,
            end_hour,
            interval_minutes,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn buckets(&self) -> Vec<SlotBucket> {
        generate_time_slots(self.start_hour, self.end_hour, self.interval_minutes)
    }

    /// Flat, ascending list of every slot.
    pub fn all_slots(&self) -> Vec<String> {
        self.buckets().into_iter().flat_map(|b| b.slots).collect()
    }

    /// Whether `slot` is one of this schedule's slots.
    pub fn contains(&self, slot: &str) -> bool {
        let Ok(time) = parse_slot(slot) else {
            return false;
        };
        time.hour() >= self.start_hour
            && time.hour() <= self.end_hour
            && time.minute() % self.interval_minutes == 0
    }

    /// Combines a date and one of this schedule's slots into a start time.
    pub fn start_at(&self, date: NaiveDate, slot: &str) -> ValidationResult<NaiveDateTime> {
        if !self.contains(slot) {
            return Err(ValidationError::InvalidFormat {
                field: "time".to_string(),
                reason: format!("'{}' is not a bookable slot", slot),
            });
        }
        Ok(date.and_time(parse_slot(slot)?))
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        SlotSchedule {
            start_hour: DEFAULT_OPENING_HOUR,
            end_hour: DEFAULT_CLOSING_HOUR,
            interval_minutes: SLOT_INTERVAL_MINUTES,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
