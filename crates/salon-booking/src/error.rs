//! # Booking Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Domain      │  │     Storage / Sink      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Core(..)       │  │  Database(..)           │ │
//! │  │  ConfigLoad     │  │  (wizard, slot  │  │  SinkClosed             │ │
//! │  │  ConfigSave     │  │   conflicts)    │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use salon_core::CoreError;
use salon_db::DbError;
use thiserror::Error;

/// Result type alias for booking operations.
pub type BookingResult<T> = Result<T, BookingError>;

#[derive(Debug, Error)]
pub enum BookingError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A config value failed validation.
    #[error("Invalid booking configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Domain / Storage Errors
    // =========================================================================
    /// A wizard or scheduling rule was violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The SQLite data source failed.
    #[error("Database error: {0}")]
    Database(DbError),

    /// The receiving end of a channel sink is gone.
    #[error("Booking sink is closed")]
    SinkClosed,
}

/// Domain errors raised inside a repository surface as `Core`, so callers
/// match slot conflicts the same way for every data source.
impl From<DbError> for BookingError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => BookingError::Core(core),
            other => BookingError::Database(other),
        }
    }
}

impl From<std::io::Error> for BookingError {
    fn from(err: std::io::Error) -> Self {
        BookingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for BookingError {
    fn from(err: toml::de::Error) -> Self {
        BookingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for BookingError {
    fn from(err: toml::ser::Error) -> Self {
        BookingError::ConfigSaveFailed(err.to_string())
    }
}

impl BookingError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidConfig(_)
                | BookingError::ConfigLoadFailed(_)
                | BookingError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the employee was already booked for the slot.
    pub fn is_slot_conflict(&self) -> bool {
        matches!(self, BookingError::Core(CoreError::SlotConflict { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_db_domain_error_is_flattened() {
        let conflict = CoreError::SlotConflict {
            employee_id: "mai".into(),
            start: NaiveDate::from_ymd_opt(2025, 3, 14)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            appointment_id: "a1".into(),
        };

        let err: BookingError = DbError::Domain(conflict).into();
        assert!(err.is_slot_conflict());

        let err: BookingError = DbError::PoolExhausted.into();
        assert!(matches!(err, BookingError::Database(DbError::PoolExhausted)));
    }

    #[test]
    fn test_config_errors() {
        assert!(BookingError::InvalidConfig("bad".into()).is_config_error());
        assert!(!BookingError::SinkClosed.is_config_error());
    }
}
