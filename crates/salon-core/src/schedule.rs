//! # Double-Booking Detection
//!
//! An employee can serve one customer at a time. A booking conflicts with
//! an existing, non-cancelled appointment of the same employee when their
//! `[start, start + duration)` intervals overlap.
//!
//! ```text
//!  Mai   10:00 ████████████ 11:00          existing (60 min)
//!  Mai         10:30 ██████ 11:15          ✗ conflict
//!  Mai                      11:00 ████     ✓ back-to-back is fine
//!  Tom         10:30 ██████                ✓ other employee
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{CoreError, CoreResult};
use crate::slots::SlotSchedule;
use crate::types::{Appointment, BookingRecord};

/// First appointment of `employee_id` overlapping the candidate interval.
pub fn find_conflict<'a>(
    existing: &'a [Appointment],
    employee_id: &str,
    start: NaiveDateTime,
    duration_minutes: u32,
) -> Option<&'a Appointment> {
    let end = start + Duration::minutes(duration_minutes as i64);
    existing.iter().find(|appt| {
        appt.employee_id == employee_id && appt.status.occupies_slot() && appt.overlaps(start, end)
    })
}

/// Rejects `record` with `SlotConflict` if it would double-book its employee.
pub fn ensure_available(existing: &[Appointment], record: &BookingRecord) -> CoreResult<()> {
    match find_conflict(
        existing,
        &record.employee_id,
        record.start_at,
        record.duration_minutes,
    ) {
        Some(appt) => Err(CoreError::SlotConflict {
            employee_id: record.employee_id.clone(),
            start: record.start_at,
            appointment_id: appt.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Slots of `schedule` on `date` where `employee_id` is free for
/// `duration_minutes`.
pub fn available_slots(
    schedule: &SlotSchedule,
    date: NaiveDate,
    existing: &[Appointment],
    employee_id: &str,
    duration_minutes: u32,
) -> Vec<String> {
    schedule
        .all_slots()
        .into_iter()
        .filter(|slot| match schedule.start_at(date, slot) {
            Ok(start) => find_conflict(existing, employee_id, start, duration_minutes).is_none(),
            Err(_) => false,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppointmentStatus, CustomerInfo};
    use chrono::Utc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn appointment(id: &str, employee: &str, start: NaiveDateTime, minutes: u32) -> Appointment {
        Appointment {
            id: id.to_string(),
            customer_id: "c1".to_string(),
            employee_id: employee.to_string(),
            service_id: "gel".to_string(),
            start_at: start,
            duration_minutes: minutes,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    fn record(employee: &str, start: NaiveDateTime, minutes: u32) -> BookingRecord {
        BookingRecord {
            customer: CustomerInfo::new("Ana", "ana@example.com", "555"),
            employee_id: employee.to_string(),
            service_id: "gel".to_string(),
            start_at: start,
            duration_minutes: minutes,
            status: AppointmentStatus::Scheduled,
        }
    }

    #[test]
    fn test_overlap_same_employee_conflicts() {
        let existing = vec![appointment("a1", "mai", at(10, 0), 60)];

        let err = ensure_available(&existing, &record("mai", at(10, 30), 45)).unwrap_err();
        match err {
            CoreError::SlotConflict { appointment_id, .. } => assert_eq!(appointment_id, "a1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_back_to_back_and_other_employee_are_free() {
        let existing = vec![appointment("a1", "mai", at(10, 0), 60)];

        assert!(ensure_available(&existing, &record("mai", at(11, 0), 30)).is_ok());
        assert!(ensure_available(&existing, &record("mai", at(9, 15), 45)).is_ok());
        assert!(ensure_available(&existing, &record("tom", at(10, 30), 45)).is_ok());
    }

    #[test]
    fn test_cancelled_appointment_frees_slot() {
        let mut cancelled = appointment("a1", "mai", at(10, 0), 60);
        cancelled.status = AppointmentStatus::Cancelled;

        assert!(find_conflict(&[cancelled], "mai", at(10, 0), 60).is_none());
    }

    #[test]
    fn test_available_slots_skip_busy_interval() {
        let existing = vec![appointment("a1", "mai", at(10, 0), 60)];
        let slots = available_slots(&SlotSchedule::default(), date(), &existing, "mai", 30);

        assert!(slots.contains(&"09:30".to_string()));
        assert!(!slots.contains(&"09:45".to_string()));
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(!slots.contains(&"10:45".to_string()));
        assert!(slots.contains(&"11:00".to_string()));
        assert_eq!(slots.len(), 40 - 5);
    }
}
