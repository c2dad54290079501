//! # Service Repository
//!
//! Database operations for the service catalog.
//!
//! Services are listed in `sort_order`, which is the order they were
//! seeded in; category grouping downstream relies on it being stable.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::to_u32;
use salon_core::Service;

/// Row shape of the `services` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub points_earned: Option<i64>,
    pub points_price: Option<i64>,
    pub category: String,
    pub description: String,
}

impl TryFrom<ServiceRecord> for Service {
    type Error = DbError;

    fn try_from(record: ServiceRecord) -> DbResult<Self> {
        Ok(Service {
            duration_minutes: to_u32("services.duration_minutes", record.duration_minutes)?,
            id: record.id,
            name: record.name,
            price_cents: record.price_cents,
            points_earned: record.points_earned,
            points_price: record.points_price,
            category: record.category,
            description: record.description,
        })
    }
}

const SELECT_SERVICE: &str = r#"
    SELECT id, name, duration_minutes, price_cents,
           points_earned, points_price, category, description
    FROM services
"#;

/// Repository for service database operations.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    /// Creates a new ServiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// Lists active services in display order.
    pub async fn list(&self) -> DbResult<Vec<Service>> {
        let records = sqlx::query_as::<_, ServiceRecord>(&format!(
            "{} WHERE is_active = 1 ORDER BY sort_order, rowid",
            SELECT_SERVICE
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "Loaded services");
        records.into_iter().map(Service::try_from).collect()
    }

    /// Gets a service by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Service>> {
        let record = sqlx::query_as::<_, ServiceRecord>(&format!("{} WHERE id = ?1", SELECT_SERVICE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Service::try_from).transpose()
    }

    /// Inserts a service at position `sort_order`.
    pub async fn insert(&self, service: &Service, sort_order: i64) -> DbResult<()> {
        debug!(id = %service.id, category = %service.category, "Inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, duration_minutes, price_cents,
                points_earned, points_price, category, description, sort_order
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.duration_minutes as i64)
        .bind(service.price_cents)
        .bind(service.points_earned)
        .bind(service.points_price)
        .bind(&service.category)
        .bind(&service.description)
        .bind(sort_order)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("service id", service.id.clone()),
            other => other,
        })?;

        Ok(())
    }

    /// Counts active services.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::seeded_db;
    use crate::DbError;
    use salon_core::demo_catalog;

    #[tokio::test]
    async fn test_list_keeps_seed_order() {
        let db = seeded_db().await;

        let services = db.services().list().await.unwrap();
        assert_eq!(services, demo_catalog().services());
        assert_eq!(db.services().count().await.unwrap(), services.len() as i64);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = seeded_db().await;

        let gel = db.services().get_by_id("gel-manicure").await.unwrap().unwrap();
        assert_eq!(gel.duration_minutes, 45);
        assert_eq!(gel.price_cents, 4000);
        assert!(db.services().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let db = seeded_db().await;
        let gel = db.services().get_by_id("gel-manicure").await.unwrap().unwrap();

        let err = db.services().insert(&gel, 99).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
