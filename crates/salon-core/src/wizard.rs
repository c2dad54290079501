//! # Booking Wizard
//!
//! The five-step booking flow and its step validator.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SERVICE ──next──► EMPLOYEE ──next──► TIME ──next──► DETAILS           │
//! │      ▲                  ▲                ▲               │              │
//! │      └──────────────────┴──── go_to ─────┘             next             │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                         CONFIRM (terminal, emits        │
//! │                                                  BookingRecord)         │
//! │                                                                         │
//! │  next:  only when is_step_valid(current)                               │
//! │  go_to: target at/before current, or every step before target valid    │
//! │  CONFIRM: no navigation, no mutation                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use salon_core::wizard::{WizardState, WizardStep};
//!
//! let mut wizard = WizardState::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
//! assert_eq!(wizard.step(), WizardStep::Service);
//! assert!(!wizard.is_current_step_valid());
//! assert!(wizard.next().is_err());
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::slots::SlotSchedule;
use crate::types::{AppointmentStatus, BookingRecord, CustomerInfo, Employee, Service};
use crate::validation::{parse_slot, SLOT_FORMAT};

// =============================================================================
// Wizard Step
// =============================================================================

/// One of the five linear booking stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum WizardStep {
    Service,
    Employee,
    Time,
    Details,
    Confirm,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Service,
        WizardStep::Employee,
        WizardStep::Time,
        WizardStep::Details,
        WizardStep::Confirm,
    ];

    /// Zero-based position in the flow.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The following step; `None` for CONFIRM.
    pub fn next(&self) -> Option<WizardStep> {
        WizardStep::ALL.get(self.index() + 1).copied()
    }

    /// Steps strictly before this one.
    pub fn predecessors(&self) -> &'static [WizardStep] {
        &STEP_ORDER[..self.index()]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Service => "SERVICE",
            WizardStep::Employee => "EMPLOYEE",
            WizardStep::Time => "TIME",
            WizardStep::Details => "DETAILS",
            WizardStep::Confirm => "CONFIRM",
        }
    }
}

static STEP_ORDER: [WizardStep; 5] = WizardStep::ALL;

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Step Validator
// =============================================================================

/// Whether `step`'s data is complete enough to advance past it.
///
/// | Step     | Valid when                                       |
/// |----------|--------------------------------------------------|
/// | SERVICE  | cart has at least one line                       |
/// | EMPLOYEE | an employee is selected                          |
/// | TIME     | a time slot is selected                          |
/// | DETAILS  | name, email, phone non-blank after trimming      |
/// | CONFIRM  | always                                           |
pub fn is_step_valid(step: WizardStep, state: &WizardState) -> bool {
    match step {
        WizardStep::Service => !state.cart.is_empty(),
        WizardStep::Employee => state.employee_id.is_some(),
        WizardStep::Time => state.time_slot.is_some(),
        WizardStep::Details => state.customer.is_complete(),
        WizardStep::Confirm => true,
    }
}

// =============================================================================
// Wizard State
// =============================================================================

/// Result of a successful `next()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward to the contained step.
    Advanced(WizardStep),
    /// DETAILS → CONFIRM. The record must be handed to the persistence
    /// collaborator; the wizard keeps no reference to it.
    Completed(BookingRecord),
}

/// Everything one booking session has accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    step: WizardStep,
    cart: Cart,
    employee_id: Option<String>,
    date: NaiveDate,
    time_slot: Option<String>,
    customer: CustomerInfo,
    #[serde(skip)]
    schedule: SlotSchedule,
}

impl WizardState {
    /// Fresh wizard on SERVICE for `date`, default opening hours.
    pub fn new(date: NaiveDate) -> Self {
        Self::with_schedule(date, SlotSchedule::default())
    }

    pub fn with_schedule(date: NaiveDate, schedule: SlotSchedule) -> Self {
        WizardState {
            step: WizardStep::Service,
            cart: Cart::new(),
            employee_id: None,
            date,
            time_slot: None,
            customer: CustomerInfo::default(),
            schedule,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn employee_id(&self) -> Option<&str> {
        self.employee_id.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time_slot(&self) -> Option<&str> {
        self.time_slot.as_deref()
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// True once CONFIRM has been reached.
    pub fn is_complete(&self) -> bool {
        self.step == WizardStep::Confirm
    }

    pub fn is_current_step_valid(&self) -> bool {
        is_step_valid(self.step, self)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Whether the step indicator for `target` is clickable.
    ///
    /// CONFIRM is only entered through `next()`, so it is never a `go_to`
    /// target, and nothing is reachable once the booking is confirmed.
    pub fn can_navigate_to(&self, target: WizardStep) -> bool {
        if self.is_complete() || target == WizardStep::Confirm {
            return false;
        }
        if target <= self.step {
            return true;
        }
        target
            .predecessors()
            .iter()
            .all(|&step| is_step_valid(step, self))
    }

    /// Advances one step.
    ///
    /// ## Errors
    /// - `BookingCompleted` on CONFIRM
    /// - `StepIncomplete` when the current step is not valid, or when an
    ///   earlier step was emptied after it was passed
    pub fn next(&mut self) -> CoreResult<Transition> {
        if self.is_complete() {
            return Err(CoreError::BookingCompleted);
        }
        if !self.is_current_step_valid() {
            return Err(CoreError::StepIncomplete { step: self.step });
        }

        if self.step == WizardStep::Details {
            let record = self.booking_record()?;
            self.step = WizardStep::Confirm;
            return Ok(Transition::Completed(record));
        }

        let next = self.step.next().ok_or(CoreError::BookingCompleted)?;
        self.step = next;
        Ok(Transition::Advanced(next))
    }

    /// Jumps to `target` if its indicator is clickable.
    pub fn go_to(&mut self, target: WizardStep) -> CoreResult<()> {
        if self.is_complete() {
            return Err(CoreError::BookingCompleted);
        }
        if !self.can_navigate_to(target) {
            return Err(CoreError::StepUnreachable {
                from: self.step,
                to: target,
            });
        }
        self.step = target;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selections
    // -------------------------------------------------------------------------

    /// Applies a quantity change to the cart (see [`Cart::adjust_quantity`]).
    pub fn adjust_quantity(&mut self, service: &Service, delta: i32) -> CoreResult<()> {
        self.ensure_open()?;
        self.cart.adjust_quantity(service, delta);
        Ok(())
    }

    pub fn remove_service(&mut self, service_id: &str) -> CoreResult<bool> {
        self.ensure_open()?;
        Ok(self.cart.remove(service_id))
    }

    pub fn select_employee(&mut self, employee: &Employee) -> CoreResult<()> {
        self.ensure_open()?;
        self.employee_id = Some(employee.id.clone());
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> CoreResult<()> {
        self.ensure_open()?;
        self.date = date;
        Ok(())
    }

    /// Selects a slot; it must belong to the wizard's schedule. The slot is
    /// stored in canonical "HH:MM" form.
    pub fn select_time_slot(&mut self, slot: &str) -> CoreResult<()> {
        self.ensure_open()?;
        let slot = slot.trim();
        if !self.schedule.contains(slot) {
            return Err(CoreError::SlotUnavailable {
                slot: slot.to_string(),
            });
        }
        let time = parse_slot(slot)?;
        self.time_slot = Some(time.format(SLOT_FORMAT).to_string());
        Ok(())
    }

    pub fn clear_time_slot(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.time_slot = None;
        Ok(())
    }

    pub fn set_customer(&mut self, customer: CustomerInfo) -> CoreResult<()> {
        self.ensure_open()?;
        self.customer = customer;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_complete() {
            return Err(CoreError::BookingCompleted);
        }
        Ok(())
    }

    /// Builds the outgoing record from the primary service, the employee and
    /// date + slot.
    fn booking_record(&self) -> CoreResult<BookingRecord> {
        let primary = self
            .cart
            .primary_line()
            .ok_or(CoreError::StepIncomplete {
                step: WizardStep::Service,
            })?;
        let employee_id = self.employee_id.clone().ok_or(CoreError::StepIncomplete {
            step: WizardStep::Employee,
        })?;
        let slot = self.time_slot.as_deref().ok_or(CoreError::StepIncomplete {
            step: WizardStep::Time,
        })?;
        let start_at = self.schedule.start_at(self.date, slot)?;

        Ok(BookingRecord {
            customer: CustomerInfo::new(
                self.customer.name.trim(),
                self.customer.email.trim(),
                self.customer.phone.trim(),
            ),
            employee_id,
            service_id: primary.service.id.clone(),
            start_at,
            duration_minutes: primary.service.duration_minutes,
            status: AppointmentStatus::Scheduled,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn gel() -> Service {
        Service {
            id: "gel".to_string(),
            name: "Gel Manicure".to_string(),
            duration_minutes: 45,
            price_cents: 5000,
            points_earned: Some(50),
            points_price: Some(500),
            category: "Manicure".to_string(),
            description: String::new(),
        }
    }

    fn mai() -> Employee {
        Employee {
            id: "mai".to_string(),
            name: "Mai".to_string(),
            email: "mai@salon.test".to_string(),
            phone: "555-0101".to_string(),
            specialties: vec!["Manicure".to_string()],
            color: "#f472b6".to_string(),
        }
    }

    fn ready_for_details() -> WizardState {
        let mut wizard = WizardState::new(date());
        wizard.adjust_quantity(&gel(), 1).unwrap();
        wizard.next().unwrap();
        wizard.select_employee(&mai()).unwrap();
        wizard.next().unwrap();
        wizard.select_time_slot("10:00").unwrap();
        wizard.next().unwrap();
        wizard
    }

    #[test]
    fn test_service_step_valid_iff_cart_non_empty() {
        let mut wizard = WizardState::new(date());
        assert!(!is_step_valid(WizardStep::Service, &wizard));

        wizard.adjust_quantity(&gel(), 1).unwrap();
        assert!(is_step_valid(WizardStep::Service, &wizard));

        wizard.adjust_quantity(&gel(), -1).unwrap();
        assert!(!is_step_valid(WizardStep::Service, &wizard));
    }

    #[test]
    fn test_details_requires_trimmed_fields() {
        let mut wizard = WizardState::new(date());
        wizard
            .set_customer(CustomerInfo::new("Ana", "ana@example.com", "   "))
            .unwrap();
        assert!(!is_step_valid(WizardStep::Details, &wizard));

        wizard
            .set_customer(CustomerInfo::new("Ana", "ana@example.com", "555-0100"))
            .unwrap();
        assert!(is_step_valid(WizardStep::Details, &wizard));
        assert!(is_step_valid(WizardStep::Confirm, &wizard));
    }

    #[test]
    fn test_details_accepts_long_name() {
        let mut wizard = WizardState::new(date());
        wizard
            .set_customer(CustomerInfo::new("A".repeat(201), "a@b.c", "555"))
            .unwrap();
        assert!(is_step_valid(WizardStep::Details, &wizard));
    }

    #[test]
    fn test_next_blocked_on_incomplete_step() {
        let mut wizard = WizardState::new(date());
        let err = wizard.next().unwrap_err();
        assert!(matches!(
            err,
            CoreError::StepIncomplete {
                step: WizardStep::Service
            }
        ));
        assert_eq!(wizard.step(), WizardStep::Service);
    }

    #[test]
    fn test_full_booking_scenario() {
        let mut wizard = WizardState::new(date());

        wizard.adjust_quantity(&gel(), 1).unwrap();
        assert_eq!(wizard.cart().total_price(), Money::from_major(50));
        assert_eq!(wizard.cart().total_points(), 50);
        assert_eq!(wizard.cart().total_items(), 1);
        assert_eq!(wizard.next().unwrap(), Transition::Advanced(WizardStep::Employee));

        wizard.select_employee(&mai()).unwrap();
        assert!(is_step_valid(WizardStep::Employee, &wizard));
        wizard.next().unwrap();

        wizard.select_time_slot("10:00").unwrap();
        assert!(is_step_valid(WizardStep::Time, &wizard));
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::Details);

        wizard
            .set_customer(CustomerInfo::new(" Ana ", "ana@example.com", "555-0100"))
            .unwrap();
        assert!(is_step_valid(WizardStep::Details, &wizard));

        let Transition::Completed(record) = wizard.next().unwrap() else {
            panic!("expected a completed booking");
        };
        assert_eq!(record.status, AppointmentStatus::Scheduled);
        assert_eq!(record.service_id, "gel");
        assert_eq!(record.employee_id, "mai");
        assert_eq!(record.customer.name, "Ana");
        assert_eq!(record.duration_minutes, 45);
        assert_eq!(record.start_at.to_string(), "2025-03-14 10:00:00");

        assert_eq!(wizard.step(), WizardStep::Confirm);
        for step in WizardStep::ALL {
            assert!(!wizard.can_navigate_to(step));
        }
        assert!(matches!(wizard.next(), Err(CoreError::BookingCompleted)));
        assert!(matches!(
            wizard.go_to(WizardStep::Service),
            Err(CoreError::BookingCompleted)
        ));
        assert!(matches!(
            wizard.adjust_quantity(&gel(), 1),
            Err(CoreError::BookingCompleted)
        ));
    }

    #[test]
    fn test_primary_service_is_first_selected() {
        let mut wizard = WizardState::new(date());
        let mut spa = gel();
        spa.id = "spa".to_string();
        spa.duration_minutes = 60;

        wizard.adjust_quantity(&spa, 1).unwrap();
        wizard.adjust_quantity(&gel(), 1).unwrap();
        wizard.next().unwrap();
        wizard.select_employee(&mai()).unwrap();
        wizard.next().unwrap();
        wizard.select_time_slot("11:30").unwrap();
        wizard.next().unwrap();
        wizard
            .set_customer(CustomerInfo::new("Ana", "ana@example.com", "555"))
            .unwrap();

        let Transition::Completed(record) = wizard.next().unwrap() else {
            panic!("expected a completed booking");
        };
        assert_eq!(record.service_id, "spa");
        assert_eq!(record.duration_minutes, 60);
    }

    #[test]
    fn test_go_to_backwards_and_forwards() {
        let mut wizard = ready_for_details();
        assert_eq!(wizard.step(), WizardStep::Details);

        wizard.go_to(WizardStep::Service).unwrap();
        assert_eq!(wizard.step(), WizardStep::Service);

        // Every step before DETAILS is still valid, so jumping back is fine.
        assert!(wizard.can_navigate_to(WizardStep::Details));
        wizard.go_to(WizardStep::Details).unwrap();

        // CONFIRM is only entered through next().
        assert!(!wizard.can_navigate_to(WizardStep::Confirm));
    }

    #[test]
    fn test_go_to_forward_requires_valid_predecessors() {
        let mut wizard = WizardState::new(date());
        wizard.adjust_quantity(&gel(), 1).unwrap();

        assert!(wizard.can_navigate_to(WizardStep::Employee));
        assert!(!wizard.can_navigate_to(WizardStep::Time));
        assert!(matches!(
            wizard.go_to(WizardStep::Time),
            Err(CoreError::StepUnreachable { .. })
        ));
    }

    #[test]
    fn test_emptied_cart_blocks_confirmation() {
        let mut wizard = ready_for_details();
        wizard
            .set_customer(CustomerInfo::new("Ana", "ana@example.com", "555"))
            .unwrap();
        wizard.remove_service("gel").unwrap();

        assert!(matches!(
            wizard.next(),
            Err(CoreError::StepIncomplete {
                step: WizardStep::Service
            })
        ));
        assert_eq!(wizard.step(), WizardStep::Details);
    }

    #[test]
    fn test_slot_outside_schedule_rejected() {
        let mut wizard = WizardState::new(date());
        assert!(matches!(
            wizard.select_time_slot("20:00"),
            Err(CoreError::SlotUnavailable { .. })
        ));
        assert!(wizard.time_slot().is_none());
    }

    #[test]
    fn test_slot_stored_zero_padded() {
        let mut wizard = WizardState::new(date());
        wizard.select_time_slot(" 9:00").unwrap();
        assert_eq!(wizard.time_slot(), Some("09:00"));
        assert!(wizard.schedule().all_slots().contains(&"09:00".to_string()));
    }

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::Service.next(), Some(WizardStep::Employee));
        assert_eq!(WizardStep::Confirm.next(), None);
        assert_eq!(WizardStep::Time.predecessors(), [WizardStep::Service, WizardStep::Employee]);
        assert_eq!(
            serde_json::to_string(&WizardStep::Details).unwrap(),
            "\"DETAILS\""
        );
    }
}
