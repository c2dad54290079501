//! # SQLite Data Source
//!
//! Thin adapter from [`DataSource`] onto the salon-db repositories.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use super::DataSource;
use crate::error::BookingResult;
use salon_core::stats::DailyStats;
use salon_core::{Appointment, BookingRecord, Customer, Employee, Service};
use salon_db::{Database, DbConfig};

#[derive(Debug, Clone)]
pub struct SqliteDataSource {
    db: Database,
}

impl SqliteDataSource {
    pub fn new(db: Database) -> Self {
        SqliteDataSource { db }
    }

    /// Opens (and migrates) the database at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> BookingResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "Opening SQLite data source");
        let db = Database::new(DbConfig::new(path)).await?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DataSource for SqliteDataSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn list_services(&self) -> BookingResult<Vec<Service>> {
        Ok(self.db.services().list().await?)
    }

    async fn list_employees(&self) -> BookingResult<Vec<Employee>> {
        Ok(self.db.employees().list().await?)
    }

    async fn list_customers(&self) -> BookingResult<Vec<Customer>> {
        Ok(self.db.customers().list().await?)
    }

    async fn list_appointments(&self) -> BookingResult<Vec<Appointment>> {
        Ok(self.db.appointments().list().await?)
    }

    async fn add_appointment(&self, record: BookingRecord) -> BookingResult<Appointment> {
        Ok(self.db.appointments().book(&record).await?)
    }

    async fn daily_stats(&self, date: NaiveDate) -> BookingResult<DailyStats> {
        Ok(self.db.stats().daily(date).await?)
    }

    async fn appointments_on(&self, date: NaiveDate) -> BookingResult<Vec<Appointment>> {
        Ok(self.db.appointments().list_on(date).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::test_support::{at, friday, record};
    use salon_core::demo_catalog;

    async fn seeded() -> SqliteDataSource {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = demo_catalog();
        for (i, s) in catalog.services().iter().enumerate() {
            db.services().insert(s, i as i64).await.unwrap();
        }
        for (i, e) in catalog.employees().iter().enumerate() {
            db.employees().insert(e, i as i64).await.unwrap();
        }
        SqliteDataSource::new(db)
    }

    #[tokio::test]
    async fn test_catalog_matches_demo() {
        let source = seeded().await;
        assert_eq!(source.load_catalog().await.unwrap(), demo_catalog());
    }

    #[tokio::test]
    async fn test_conflict_surfaces_as_core_error() {
        let source = seeded().await;
        source
            .add_appointment(record("ana@example.com", "mai", "gel-manicure", at(10, 0)))
            .await
            .unwrap();

        let err = source
            .add_appointment(record("bo@example.com", "mai", "gel-manicure", at(10, 15)))
            .await
            .unwrap_err();
        assert!(err.is_slot_conflict());

        assert_eq!(source.appointments_on(friday()).await.unwrap().len(), 1);
        assert_eq!(source.daily_stats(friday()).await.unwrap().appointment_count, 1);
    }
}
