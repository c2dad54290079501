//! # Appointment Repository
//!
//! Database operations for bookings.
//!
//! ## Booking Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  book(&record)                                                          │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    1. validate customer contact fields                                  │
//! │    2. resolve or create the customer by email                           │
//! │    3. load the employee's appointments around the start day             │
//! │    4. reject overlaps with CoreError::SlotConflict                      │
//! │    5. INSERT appointment                                                │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Start times are stored as `YYYY-MM-DD HH:MM:SS` text, so range filters
//! compare lexicographically.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::customer::{add_points_on, find_or_create_on};
use crate::repository::to_u32;
use salon_core::schedule::ensure_available;
use salon_core::validation::validate_customer_info;
use salon_core::{Appointment, AppointmentStatus, BookingRecord, CoreError};

/// Row shape of the `appointments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRecord {
    pub id: String,
    pub customer_id: String,
    pub employee_id: String,
    pub service_id: String,
    pub start_at: NaiveDateTime,
    pub duration_minutes: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = DbError;

    fn try_from(record: AppointmentRecord) -> DbResult<Self> {
        let status: AppointmentStatus = record
            .status
            .parse()
            .map_err(|e| DbError::invalid("appointments.status", e))?;

        Ok(Appointment {
            duration_minutes: to_u32("appointments.duration_minutes", record.duration_minutes)?,
            id: record.id,
            customer_id: record.customer_id,
            employee_id: record.employee_id,
            service_id: record.service_id,
            start_at: record.start_at,
            status,
            created_at: record.created_at,
        })
    }
}

const SELECT_APPOINTMENT: &str = r#"
    SELECT id, customer_id, employee_id, service_id,
           start_at, duration_minutes, status, created_at
    FROM appointments
"#;

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

fn into_appointments(records: Vec<AppointmentRecord>) -> DbResult<Vec<Appointment>> {
    records.into_iter().map(Appointment::try_from).collect()
}

/// Appointments of `employee_id` starting in `[from, to)`.
async fn list_for_employee_on(
    conn: &mut SqliteConnection,
    employee_id: &str,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> DbResult<Vec<Appointment>> {
    let records = sqlx::query_as::<_, AppointmentRecord>(&format!(
        "{} WHERE employee_id = ?1 AND start_at >= ?2 AND start_at < ?3 ORDER BY start_at",
        SELECT_APPOINTMENT
    ))
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(&mut *conn)
    .await?;

    into_appointments(records)
}

/// Repository for appointment database operations.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    /// Creates a new AppointmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AppointmentRepository { pool }
    }

    /// Lists every appointment, ordered by start time.
    pub async fn list(&self) -> DbResult<Vec<Appointment>> {
        let records = sqlx::query_as::<_, AppointmentRecord>(&format!(
            "{} ORDER BY start_at, rowid",
            SELECT_APPOINTMENT
        ))
        .fetch_all(&self.pool)
        .await?;

        into_appointments(records)
    }

    /// Lists appointments starting on `date`.
    pub async fn list_on(&self, date: NaiveDate) -> DbResult<Vec<Appointment>> {
        let from = day_start(date);
        let records = sqlx::query_as::<_, AppointmentRecord>(&format!(
            "{} WHERE start_at >= ?1 AND start_at < ?2 ORDER BY start_at, rowid",
            SELECT_APPOINTMENT
        ))
        .bind(from)
        .bind(from + Duration::days(1))
        .fetch_all(&self.pool)
        .await?;

        into_appointments(records)
    }

    /// Gets an appointment by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Appointment>> {
        let record = sqlx::query_as::<_, AppointmentRecord>(&format!("{} WHERE id = ?1", SELECT_APPOINTMENT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Appointment::try_from).transpose()
    }

    /// Persists a completed booking.
    ///
    /// ## Errors
    /// * `DbError::Domain(CoreError::Validation(_))` - blank contact field
    /// * `DbError::Domain(CoreError::SlotConflict { .. })` - employee busy
    /// * `DbError::ForeignKeyViolation` - unknown employee or service id
    pub async fn book(&self, record: &BookingRecord) -> DbResult<Appointment> {
        validate_customer_info(&record.customer).map_err(CoreError::from)?;

        debug!(
            employee_id = %record.employee_id,
            service_id = %record.service_id,
            start_at = %record.start_at,
            "Booking appointment"
        );

        let mut tx = self.pool.begin().await?;

        let customer = find_or_create_on(&mut *tx, &record.customer).await?;

        // One day either side catches appointments that cross midnight.
        let day = day_start(record.start_at.date());
        let existing = list_for_employee_on(
            &mut *tx,
            &record.employee_id,
            day - Duration::days(1),
            day + Duration::days(2),
        )
        .await?;
        ensure_available(&existing, record)?;

        let appointment = Appointment::from_record(record, Uuid::new_v4().to_string(), customer.id);

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, customer_id, employee_id, service_id,
                start_at, duration_minutes, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.customer_id)
        .bind(&appointment.employee_id)
        .bind(&appointment.service_id)
        .bind(appointment.start_at)
        .bind(appointment.duration_minutes as i64)
        .bind(appointment.status.as_str())
        .bind(appointment.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = %appointment.id, customer_id = %appointment.customer_id, "Appointment booked");
        Ok(appointment)
    }

    /// Moves an appointment to `status`.
    ///
    /// The first transition into `Completed` credits the service's
    /// `points_earned` to the customer.
    pub async fn set_status(&self, id: &str, status: AppointmentStatus) -> DbResult<Appointment> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, AppointmentRecord>(&format!("{} WHERE id = ?1", SELECT_APPOINTMENT))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Appointment", id))
            .and_then(Appointment::try_from)?;

        sqlx::query("UPDATE appointments SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if status == AppointmentStatus::Completed && current.status != AppointmentStatus::Completed {
            let points =
                sqlx::query_scalar::<_, Option<i64>>("SELECT points_earned FROM services WHERE id = ?1")
                    .bind(&current.service_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .flatten();
            if let Some(points) = points.filter(|p| *p > 0) {
                add_points_on(&mut *tx, &current.customer_id, points).await?;
            }
        }

        tx.commit().await?;

        debug!(id = %id, from = %current.status, to = %status, "Appointment status changed");
        Ok(Appointment { status, ..current })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::seeded_db;
    use salon_core::CustomerInfo;

    fn start(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(email: &str, employee: &str, service: &str, at: NaiveDateTime, minutes: u32) -> BookingRecord {
        BookingRecord {
            customer: CustomerInfo::new("Ana", email, "555-0101"),
            employee_id: employee.to_string(),
            service_id: service.to_string(),
            start_at: at,
            duration_minutes: minutes,
            status: AppointmentStatus::Scheduled,
        }
    }

    #[tokio::test]
    async fn test_book_round_trip() {
        let db = seeded_db().await;
        let repo = db.appointments();

        let booked = repo
            .book(&record("ana@example.com", "mai", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap();

        let stored = repo.get_by_id(&booked.id).await.unwrap().unwrap();
        assert_eq!(stored.start_at, start(10, 0));
        assert_eq!(stored.duration_minutes, 45);
        assert_eq!(stored.status, AppointmentStatus::Scheduled);
        assert_eq!(stored.customer_id, booked.customer_id);

        let day = repo.list_on(start(0, 0).date()).await.unwrap();
        assert_eq!(day.len(), 1);
        assert!(repo.list_on(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_booking_rejected() {
        let db = seeded_db().await;
        let repo = db.appointments();
        let first = repo
            .book(&record("ana@example.com", "mai", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap();

        let err = repo
            .book(&record("bo@example.com", "mai", "classic-manicure", start(10, 30), 30))
            .await
            .unwrap_err();
        match err {
            DbError::Domain(CoreError::SlotConflict { appointment_id, .. }) => {
                assert_eq!(appointment_id, first.id)
            }
            other => panic!("unexpected error: {other}"),
        }

        // Another employee, and back-to-back, are both fine.
        repo.book(&record("bo@example.com", "lena", "classic-manicure", start(10, 30), 30))
            .await
            .unwrap();
        repo.book(&record("cy@example.com", "mai", "classic-manicure", start(10, 45), 30))
            .await
            .unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 3);
        // The rejected booking rolled back its customer insert.
        assert_eq!(db.customers().list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_slot_can_be_rebooked() {
        let db = seeded_db().await;
        let repo = db.appointments();
        let first = repo
            .book(&record("ana@example.com", "mai", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap();

        repo.set_status(&first.id, AppointmentStatus::Cancelled).await.unwrap();
        repo.book(&record("bo@example.com", "mai", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_employee_is_foreign_key_violation() {
        let db = seeded_db().await;

        let err = db
            .appointments()
            .book(&record("ana@example.com", "zoe", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_blank_contact_rejected() {
        let db = seeded_db().await;

        let err = db
            .appointments()
            .book(&record("  ", "mai", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_completion_awards_points_once() {
        let db = seeded_db().await;
        let repo = db.appointments();
        let appt = repo
            .book(&record("ana@example.com", "mai", "gel-manicure", start(10, 0), 45))
            .await
            .unwrap();

        let done = repo.set_status(&appt.id, AppointmentStatus::Completed).await.unwrap();
        assert_eq!(done.status, AppointmentStatus::Completed);
        repo.set_status(&appt.id, AppointmentStatus::Completed).await.unwrap();

        let customer = db.customers().get_by_id(&appt.customer_id).await.unwrap().unwrap();
        assert_eq!(customer.points_balance, 40);

        let err = repo.set_status("missing", AppointmentStatus::NoShow).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
