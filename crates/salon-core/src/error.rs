//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── CoreError        - Wizard, cart and scheduling rule violations    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  salon-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  salon-booking errors                                                  │
//! │  └── BookingError     - What hosts see                                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BookingError → Host               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Incomplete steps are normally prevented by disabling the "next" control
//! (see [`crate::wizard::is_step_valid`]). `StepIncomplete` only shows up when
//! a caller advances anyway.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::wizard::WizardStep;

// =============================================================================
// Core Error
// =============================================================================

/// Core booking errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Service id is not in the catalog.
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Employee id is not in the catalog.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// `next()` was called while the current step is incomplete.
    #[error("Step {step} is incomplete")]
    StepIncomplete { step: WizardStep },

    /// `go_to()` targeted a step whose predecessors are not all valid.
    #[error("Cannot navigate from {from} to {to}")]
    StepUnreachable { from: WizardStep, to: WizardStep },

    /// The wizard already reached CONFIRM; the session is terminal.
    #[error("Booking is already confirmed")]
    BookingCompleted,

    /// The time slot is outside the salon's schedule or already taken.
    #[error("Time slot {slot} is not available")]
    SlotUnavailable { slot: String },

    /// The employee already has an overlapping appointment.
    ///
    /// ## User Workflow
    /// ```text
    /// Anna booked 10:00-11:00 (appointment A)
    ///      │
    ///      ▼
    /// New booking: Anna @ 10:30, 45 min
    ///      │
    ///      ▼
    /// SlotConflict { employee_id: "anna", start: 10:30, appointment_id: "A" }
    /// ```
    #[error("Employee {employee_id} is already booked at {start} (appointment {appointment_id})")]
    SlotConflict {
        employee_id: String,
        start: NaiveDateTime,
        appointment_id: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., bad date, bad slot string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
