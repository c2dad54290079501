//! # Domain Types
//!
//! Core domain types used throughout the booking flow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data (immutable, from a DataSource)                          │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Service      │   │    Employee     │                              │
//! │  │  id, name       │   │  id, name       │                              │
//! │  │  duration       │   │  specialties    │                              │
//! │  │  price_cents    │   │  color          │                              │
//! │  │  category       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Booking output                                                         │
//! │  ┌─────────────────┐   add_appointment   ┌─────────────────┐           │
//! │  │ BookingRecord   │ ──────────────────► │  Appointment    │           │
//! │  │ (wizard result) │                     │  (persisted)    │           │
//! │  └─────────────────┘                     └─────────────────┘           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Service
// =============================================================================

/// A bookable salon service (manicure, gel polish, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Service {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// How long the service takes, in minutes.
    pub duration_minutes: u32,

    /// Price in cents.
    pub price_cents: i64,

    /// Loyalty points the customer earns per unit booked.
    pub points_earned: Option<i64>,

    /// Price when paid with loyalty points instead of money.
    pub points_price: Option<i64>,

    /// Free-text grouping key ("Manicure", "Pedicure", ...).
    pub category: String,

    pub description: String,
}

impl Service {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Points earned per unit; services without a loyalty value earn 0.
    #[inline]
    pub fn points(&self) -> i64 {
        self.points_earned.unwrap_or(0)
    }
}

// =============================================================================
// Employee
// =============================================================================

/// A staff member who can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Specialty tags, matched case-insensitively against service categories.
    pub specialties: Vec<String>,
    /// Calendar color (hex string).
    pub color: String,
}

impl Employee {
    /// Checks whether this employee lists the given specialty.
    pub fn has_specialty(&self, tag: &str) -> bool {
        self.specialties
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(tag.trim()))
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Contact details typed into the DETAILS step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerInfo {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        CustomerInfo {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// True when name, email and phone are all non-blank after trimming.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// A customer known to the CRM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Accumulated loyalty points.
    pub points_balance: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Appointment Status
// =============================================================================

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum AppointmentStatus {
    /// Booked and upcoming. Every wizard booking starts here.
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Storage representation, identical to the serde form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }

    /// Cancelled appointments free their slot.
    pub const fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// Only scheduled and completed appointments count as revenue.
    pub const fn earns_revenue(&self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::Completed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" | "CANCELED" => Ok(AppointmentStatus::Cancelled),
            "NO_SHOW" => Ok(AppointmentStatus::NoShow),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown appointment status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Booking Record
// =============================================================================

/// The record a completed wizard hands to the persistence collaborator.
///
/// Only the primary (first) cart line is referenced; that is what the
/// appointment calendar stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BookingRecord {
    pub customer: CustomerInfo,
    pub employee_id: String,
    pub service_id: String,
    /// Salon-local start time (selected date + slot).
    #[ts(as = "String")]
    pub start_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
}

impl BookingRecord {
    #[inline]
    pub fn end_at(&self) -> NaiveDateTime {
        self.start_at + Duration::minutes(self.duration_minutes as i64)
    }
}

// =============================================================================
// Appointment
// =============================================================================

/// A persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Appointment {
    pub id: String,
    pub customer_id: String,
    pub employee_id: String,
    pub service_id: String,
    #[ts(as = "String")]
    pub start_at: NaiveDateTime,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Builds the persisted form of a booking record.
    pub fn from_record(record: &BookingRecord, id: String, customer_id: String) -> Self {
        Appointment {
            id,
            customer_id,
            employee_id: record.employee_id.clone(),
            service_id: record.service_id.clone(),
            start_at: record.start_at,
            duration_minutes: record.duration_minutes,
            status: record.status,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn end_at(&self) -> NaiveDateTime {
        self.start_at + Duration::minutes(self.duration_minutes as i64)
    }

    /// Half-open interval overlap: `[start, end)` against this appointment.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_at < end && start < self.end_at()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
