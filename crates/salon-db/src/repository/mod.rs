//! # Repository Module
//!
//! Database repository implementations for the salon schema.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteDataSource                                                      │
//! │       │                                                                 │
//! │       │  db.appointments().book(&record)                               │
//! │       ▼                                                                 │
//! │  AppointmentRepository                                                 │
//! │  ├── list(&self)                                                       │
//! │  ├── list_on(&self, date)                                              │
//! │  ├── book(&self, record)   ← one transaction: customer + conflict +    │
//! │  │                           insert                                    │
//! │  └── set_status(&self, id, status)                                     │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are read into `sqlx::FromRow` record structs and converted into
//! `salon_core` types; conversion failures surface as
//! [`DbError::InvalidData`](crate::DbError::InvalidData).
//!
//! ## Available Repositories
//!
//! - [`ServiceRepository`](service::ServiceRepository) - Service catalog
//! - [`EmployeeRepository`](employee::EmployeeRepository) - Staff
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers, resolved by email
//! - [`AppointmentRepository`](appointment::AppointmentRepository) - Bookings
//! - [`StatsRepository`](stats::StatsRepository) - Daily and weekly figures

pub mod appointment;
pub mod customer;
pub mod employee;
pub mod service;
pub mod stats;

use crate::error::{DbError, DbResult};

/// Narrows a stored INTEGER to `u32`.
pub(crate) fn to_u32(column: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value).map_err(|_| DbError::invalid(column, format!("{} is out of range", value)))
}

/// Shared fixtures for repository tests.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Database, DbConfig};
    use salon_core::demo_catalog;

    /// Fresh in-memory database with the demo catalog inserted.
    pub async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = demo_catalog();
        for (i, service) in catalog.services().iter().enumerate() {
            db.services().insert(service, i as i64).await.unwrap();
        }
        for (i, employee) in catalog.employees().iter().enumerate() {
            db.employees().insert(employee, i as i64).await.unwrap();
        }
        db
    }
}
