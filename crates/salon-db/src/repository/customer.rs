//! # Customer Repository
//!
//! Customers are keyed by a uuid but resolved by email: a booking made with
//! a known email (case-insensitive) attaches to the existing customer,
//! otherwise a new one is created.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use salon_core::{Customer, CustomerInfo};

/// Row shape of the `customers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub points_balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Customer {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            points_balance: record.points_balance,
            created_at: record.created_at,
        }
    }
}

const SELECT_CUSTOMER: &str = r#"
    SELECT id, name, email, phone, points_balance, created_at
    FROM customers
"#;

/// Lower-cased, trimmed email used as the lookup key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) async fn find_by_email_on(
    conn: &mut SqliteConnection,
    email: &str,
) -> DbResult<Option<Customer>> {
    let record = sqlx::query_as::<_, CustomerRecord>(&format!("{} WHERE email = ?1", SELECT_CUSTOMER))
        .bind(normalize_email(email))
        .fetch_optional(&mut *conn)
        .await?;

    Ok(record.map(Customer::from))
}

pub(crate) async fn find_or_create_on(
    conn: &mut SqliteConnection,
    info: &CustomerInfo,
) -> DbResult<Customer> {
    if let Some(existing) = find_by_email_on(conn, &info.email).await? {
        debug!(id = %existing.id, "Resolved existing customer");
        return Ok(existing);
    }

    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        name: info.name.trim().to_string(),
        email: normalize_email(&info.email),
        phone: info.phone.trim().to_string(),
        points_balance: 0,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO customers (id, name, email, phone, points_balance, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&customer.id)
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.phone)
    .bind(customer.points_balance)
    .bind(customer.created_at)
    .execute(&mut *conn)
    .await?;

    info!(id = %customer.id, "Created customer");
    Ok(customer)
}

pub(crate) async fn add_points_on(conn: &mut SqliteConnection, id: &str, delta: i64) -> DbResult<()> {
    let result = sqlx::query("UPDATE customers SET points_balance = points_balance + ?1 WHERE id = ?2")
        .bind(delta)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Customer", id));
    }
    Ok(())
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists customers, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let records = sqlx::query_as::<_, CustomerRecord>(&format!(
            "{} ORDER BY created_at, rowid",
            SELECT_CUSTOMER
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Customer::from).collect())
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let record = sqlx::query_as::<_, CustomerRecord>(&format!("{} WHERE id = ?1", SELECT_CUSTOMER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Customer::from))
    }

    /// Finds a customer by email, ignoring case and surrounding whitespace.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let mut conn = self.pool.acquire().await?;
        find_by_email_on(&mut *conn, email).await
    }

    /// Returns the customer with `info.email`, creating one if needed.
    ///
    /// An existing customer keeps its stored name and phone.
    pub async fn find_or_create(&self, info: &CustomerInfo) -> DbResult<Customer> {
        let mut tx = self.pool.begin().await?;
        let customer = find_or_create_on(&mut *tx, info).await?;
        tx.commit().await?;
        Ok(customer)
    }

    /// Adds `delta` loyalty points to a customer's balance.
    pub async fn add_points(&self, id: &str, delta: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        add_points_on(&mut *conn, id, delta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_find_or_create_resolves_by_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let first = repo
            .find_or_create(&CustomerInfo::new(" Ana ", "Ana@Example.com ", "555"))
            .await
            .unwrap();
        assert_eq!(first.name, "Ana");
        assert_eq!(first.email, "ana@example.com");

        let again = repo
            .find_or_create(&CustomerInfo::new("Ana Lopez", "ana@example.COM", "999"))
            .await
            .unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.phone, "555");

        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.find_by_email("ANA@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_points() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();
        let ana = repo
            .find_or_create(&CustomerInfo::new("Ana", "ana@example.com", "555"))
            .await
            .unwrap();

        repo.add_points(&ana.id, 40).await.unwrap();
        let ana = repo.get_by_id(&ana.id).await.unwrap().unwrap();
        assert_eq!(ana.points_balance, 40);

        let err = repo.add_points("missing", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
