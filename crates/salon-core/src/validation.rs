//! # Validation Module
//!
//! Input validation for the booking flow.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host UI                                                       │
//! │  └── "Next" disabled while is_step_valid() is false                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: WizardState (Rust)                                            │
//! │  └── THIS MODULE: presence and format checks                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: DataSource                                                    │
//! │  └── Double-booking check, UNIQUE constraints                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Contact fields are only checked for presence. The salon takes
//! bookings by phone too, so email/phone formats are not enforced.

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;
use crate::types::CustomerInfo;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date format used by hosts ("2025-03-14").
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Slot format used by hosts ("09:45").
pub const SLOT_FORMAT: &str = "%H:%M";

// =============================================================================
// String Validators
// =============================================================================

/// Fails with `Required` when `value` is empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the DETAILS step contact fields.
///
/// ## Rules
/// - name, email and phone must be non-blank after trimming
/// - name at most 200 characters
///
/// ## Example
/// ```rust
/// use salon_core::types::CustomerInfo;
/// use salon_core::validation::validate_customer_info;
///
/// assert!(validate_customer_info(&CustomerInfo::new("Ana", "ana@example.com", "555")).is_ok());
/// assert!(validate_customer_info(&CustomerInfo::new("Ana", "   ", "555")).is_err());
/// ```
pub fn validate_customer_info(info: &CustomerInfo) -> ValidationResult<()> {
    validate_required("name", &info.name)?;
    validate_required("email", &info.email)?;
    validate_required("phone", &info.phone)?;

    if info.name.trim().chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Date / Time Validators
// =============================================================================

/// Parses a calendar date string.
///
/// ```rust
/// use salon_core::validation::parse_date;
///
/// assert!(parse_date("2025-03-14").is_ok());
/// assert!(parse_date("14/03/2025").is_err());
/// ```
pub fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

/// Parses an "HH:MM" slot string.
pub fn parse_slot(value: &str) -> ValidationResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), SLOT_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: "time".to_string(),
            reason: "expected HH:MM".to_string(),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an opening/closing hour pair.
///
/// ## Rules
/// - both hours in 0..=23
/// - opening hour not after closing hour
pub fn validate_hour_range(start_hour: u32, end_hour: u32) -> ValidationResult<()> {
    for (field, hour) in [("opening_hour", start_hour), ("closing_hour", end_hour)] {
        if hour > 23 {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min: 0,
                max: 23,
            });
        }
    }

    if start_hour > end_hour {
        return Err(ValidationError::OutOfRange {
            field: "opening_hour".to_string(),
            min: 0,
            max: end_hour as i64,
        });
    }

    Ok(())
}

/// Validates a slot interval in minutes (1..=60).
pub fn validate_slot_interval(minutes: u32) -> ValidationResult<()> {
    if minutes == 0 || minutes > 60 {
        return Err(ValidationError::OutOfRange {
            field: "slot_interval_minutes".to_string(),
            min: 1,
            max: 60,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
