//! # Employee Repository
//!
//! Database operations for staff. Specialties are stored as a JSON array
//! in a TEXT column.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use salon_core::Employee;

/// Row shape of the `employees` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialties: String,
    pub color: String,
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = DbError;

    fn try_from(record: EmployeeRecord) -> DbResult<Self> {
        let specialties: Vec<String> = serde_json::from_str(&record.specialties)
            .map_err(|e| DbError::invalid("employees.specialties", e))?;

        Ok(Employee {
            id: record.id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            specialties,
            color: record.color,
        })
    }
}

const SELECT_EMPLOYEE: &str = r#"
    SELECT id, name, email, phone, specialties, color
    FROM employees
"#;

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists active employees in display order.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let records = sqlx::query_as::<_, EmployeeRecord>(&format!(
            "{} WHERE is_active = 1 ORDER BY sort_order, rowid",
            SELECT_EMPLOYEE
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = records.len(), "Loaded employees");
        records.into_iter().map(Employee::try_from).collect()
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let record = sqlx::query_as::<_, EmployeeRecord>(&format!("{} WHERE id = ?1", SELECT_EMPLOYEE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Employee::try_from).transpose()
    }

    /// Inserts an employee at position `sort_order`.
    pub async fn insert(&self, employee: &Employee, sort_order: i64) -> DbResult<()> {
        debug!(id = %employee.id, "Inserting employee");

        let specialties = serde_json::to_string(&employee.specialties)
            .map_err(|e| DbError::invalid("employees.specialties", e))?;

        sqlx::query(
            r#"
            INSERT INTO employees (id, name, email, phone, specialties, color, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(specialties)
        .bind(&employee.color)
        .bind(sort_order)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts active employees.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::seeded_db;

    #[tokio::test]
    async fn test_specialties_round_trip() {
        let db = seeded_db().await;

        let mai = db.employees().get_by_id("mai").await.unwrap().unwrap();
        assert_eq!(mai.specialties, ["Manicure", "Nail Art"]);
        assert_eq!(db.employees().list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_specialties_surface_as_invalid_data() {
        let db = seeded_db().await;
        sqlx::query("UPDATE employees SET specialties = 'not json' WHERE id = 'sam'")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.employees().get_by_id("sam").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidData { .. }));
    }
}
