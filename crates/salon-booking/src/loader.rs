//! # Catalog Loader
//!
//! Fetch-once, cancellation-aware load of everything a session needs
//! before the first render.
//!
//! ```text
//!   tokio::select! (biased)
//!   ├── token.cancelled()      → None        (session closed; result dropped)
//!   └── fetch()                → Some(snapshot)
//!                                  └─ on error: logged, empty snapshot
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::BookingResult;
use crate::source::DataSource;
use salon_core::{Appointment, Catalog};

/// Catalog plus the day's appointments, as loaded at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub appointments: Vec<Appointment>,
}

pub struct CatalogLoader {
    source: Arc<dyn DataSource>,
    token: CancellationToken,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn DataSource>, token: CancellationToken) -> Self {
        CatalogLoader { source, token }
    }

    /// Loads the catalog and the appointments on `date`.
    ///
    /// Returns `None` if the token is cancelled first. A failed fetch is
    /// logged and yields an empty snapshot; it is not retried.
    pub async fn load(&self, date: NaiveDate) -> Option<Snapshot> {
        tokio::select! {
            biased;

            _ = self.token.cancelled() => {
                debug!(source = self.source.name(), "Catalog load cancelled; dropping result");
                None
            }
            result = self.fetch(date) => match result {
                Ok(snapshot) => {
                    info!(
                        source = self.source.name(),
                        services = snapshot.catalog.services().len(),
                        employees = snapshot.catalog.employees().len(),
                        appointments = snapshot.appointments.len(),
                        "Catalog loaded"
                    );
                    Some(snapshot)
                }
                Err(e) => {
                    error!(source = self.source.name(), error = %e, "Catalog load failed");
                    Some(Snapshot::default())
                }
            },
        }
    }

    async fn fetch(&self, date: NaiveDate) -> BookingResult<Snapshot> {
        let (catalog, appointments) = tokio::try_join!(
            self.source.load_catalog(),
            self.source.appointments_on(date)
        )?;
        Ok(Snapshot {
            catalog,
            appointments,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::source::test_support::friday;
    use crate::source::MemoryDataSource;
    use async_trait::async_trait;
    use salon_core::stats::DailyStats;
    use salon_core::{BookingRecord, Customer, Employee, Service};
    use salon_db::DbError;
    use std::time::Duration;

    /// Delegates to the demo source after a delay, or fails outright.
    pub(crate) struct SlowSource {
        pub delay: Duration,
        pub fail: bool,
        pub inner: MemoryDataSource,
    }

    impl SlowSource {
        pub fn new(delay: Duration) -> Self {
            SlowSource {
                delay,
                fail: false,
                inner: MemoryDataSource::demo(),
            }
        }

        async fn gate(&self) -> Result<(), BookingError> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(BookingError::Database(DbError::ConnectionFailed("source offline".into())));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl DataSource for SlowSource {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn list_services(&self) -> BookingResult<Vec<Service>> {
            self.gate().await?;
            self.inner.list_services().await
        }

        async fn list_employees(&self) -> BookingResult<Vec<Employee>> {
            self.gate().await?;
            self.inner.list_employees().await
        }

        async fn list_customers(&self) -> BookingResult<Vec<Customer>> {
            self.inner.list_customers().await
        }

        async fn list_appointments(&self) -> BookingResult<Vec<Appointment>> {
            self.inner.list_appointments().await
        }

        async fn add_appointment(&self, record: BookingRecord) -> BookingResult<Appointment> {
            self.inner.add_appointment(record).await
        }

        async fn daily_stats(&self, date: NaiveDate) -> BookingResult<DailyStats> {
            self.inner.daily_stats(date).await
        }
    }

    #[tokio::test]
    async fn test_load_resolves() {
        let loader = CatalogLoader::new(Arc::new(MemoryDataSource::demo()), CancellationToken::new());

        let snapshot = loader.load(friday()).await.unwrap();
        assert_eq!(snapshot.catalog.services().len(), 7);
        assert!(snapshot.appointments.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_load_dropped_after_cancel() {
        let token = CancellationToken::new();
        let loader = CatalogLoader::new(Arc::new(SlowSource::new(Duration::from_secs(5))), token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        assert_eq!(loader.load(friday()).await, None);
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_already_cancelled_returns_none() {
        let token = CancellationToken::new();
        token.cancel();
        let loader = CatalogLoader::new(Arc::new(MemoryDataSource::demo()), token);

        assert_eq!(loader.load(friday()).await, None);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_catalog_empty() {
        let mut source = SlowSource::new(Duration::ZERO);
        source.fail = true;
        let loader = CatalogLoader::new(Arc::new(source), CancellationToken::new());

        let snapshot = loader.load(friday()).await.unwrap();
        assert!(snapshot.catalog.is_empty());
    }
}
