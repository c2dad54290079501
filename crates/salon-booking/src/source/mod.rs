//! # Data Sources
//!
//! Pluggable storage behind the booking session.
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │   dyn DataSource          │
//!                  └────────────┬─────────────┘
//!                ┌──────────────┴──────────────┐
//!                ▼                             ▼
//!      MemoryDataSource               SqliteDataSource
//!      (demo catalog, RwLock)         (salon-db pool)
//! ```
//!
//! Both implementations resolve customers by email and reject
//! double-bookings with `CoreError::SlotConflict`.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{BookingConfig, SourceKind};
use crate::error::BookingResult;
use salon_core::stats::DailyStats;
use salon_core::{Appointment, BookingRecord, Catalog, Customer, Employee, Service};

pub use memory::MemoryDataSource;
pub use sqlite::SqliteDataSource;

/// Read/write access to services, staff, customers and appointments.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    async fn list_services(&self) -> BookingResult<Vec<Service>>;

    async fn list_employees(&self) -> BookingResult<Vec<Employee>>;

    async fn list_customers(&self) -> BookingResult<Vec<Customer>>;

    /// Every appointment, ordered by start time.
    async fn list_appointments(&self) -> BookingResult<Vec<Appointment>>;

    /// Persists a completed booking, creating the customer if its email is
    /// new.
    async fn add_appointment(&self, record: BookingRecord) -> BookingResult<Appointment>;

    async fn daily_stats(&self, date: NaiveDate) -> BookingResult<DailyStats>;

    /// Services and employees as one immutable catalog.
    async fn load_catalog(&self) -> BookingResult<Catalog> {
        let services = self.list_services().await?;
        let employees = self.list_employees().await?;
        Ok(Catalog::new(services, employees))
    }

    /// Appointments starting on `date`.
    async fn appointments_on(&self, date: NaiveDate) -> BookingResult<Vec<Appointment>> {
        let all = self.list_appointments().await?;
        Ok(all.into_iter().filter(|a| a.start_at.date() == date).collect())
    }
}

/// Builds the data source named by `config.source`.
pub async fn open_source(config: &BookingConfig) -> BookingResult<Arc<dyn DataSource>> {
    match config.source.kind {
        SourceKind::Memory => Ok(Arc::new(MemoryDataSource::demo())),
        SourceKind::Sqlite => {
            let source = SqliteDataSource::open(config.database_path()).await?;
            Ok(Arc::new(source))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_source() {
        let source = open_source(&BookingConfig::default()).await.unwrap();
        assert_eq!(source.name(), "memory");

        let catalog = source.load_catalog().await.unwrap();
        assert!(!catalog.is_empty());
    }
}
