//! # Stats Repository
//!
//! Loads the rows the dashboard needs and hands them to
//! `salon_core::stats` for aggregation.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::repository::appointment::AppointmentRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::service::ServiceRepository;
use salon_core::stats::{daily_stats, weekly_buckets, DailyStats, WeekBucket};

/// Read-only aggregation over services, customers and appointments.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Figures for one day.
    pub async fn daily(&self, date: NaiveDate) -> DbResult<DailyStats> {
        let appointments = AppointmentRepository::new(self.pool.clone()).list_on(date).await?;
        let services = ServiceRepository::new(self.pool.clone()).list().await?;
        let customers = CustomerRepository::new(self.pool.clone()).list().await?;

        Ok(daily_stats(date, &appointments, &services, &customers))
    }

    /// Every week that has at least one appointment, ascending.
    pub async fn weekly(&self) -> DbResult<Vec<WeekBucket>> {
        let appointments = AppointmentRepository::new(self.pool.clone()).list().await?;
        let services = ServiceRepository::new(self.pool.clone()).list().await?;

        Ok(weekly_buckets(&appointments, &services))
    }
}
