//! # Booking Session
//!
//! One customer's pass through the wizard, bound to an injected catalog and
//! a sink.
//!
//! ```text
//!  BookingSession::open(source, sink, schedule, date, token)
//!       │ CatalogLoader (cancellable)
//!       ▼
//!  SERVICE ─► EMPLOYEE ─► TIME ─► DETAILS ─► CONFIRM
//!    ids are resolved against the catalog;       │
//!    slots are filtered by loaded appointments   │ tokio::spawn
//!                                                ▼
//!                                         sink.emit(record)
//! ```
//!
//! The session mutates synchronously through `&mut self`; only loading and
//! hand-off are async.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::BookingResult;
use crate::loader::CatalogLoader;
use crate::sink::BookingSink;
use crate::source::DataSource;
use salon_core::schedule::{available_slots, find_conflict};
use salon_core::{
    is_step_valid, Appointment, BookingRecord, CartTotals, Catalog, CategoryGroup, CoreError,
    CustomerInfo, Service, SlotBucket, SlotSchedule, Transition, WizardState, WizardStep,
};

pub struct BookingSession {
    id: String,
    wizard: WizardState,
    catalog: Arc<Catalog>,
    /// Appointments on the wizard's date, used to hide taken slots.
    appointments: Vec<Appointment>,
    sink: Arc<dyn BookingSink>,
    token: CancellationToken,
    emission: Option<JoinHandle<()>>,
}

impl BookingSession {
    /// Session over an already-loaded catalog.
    pub fn new(
        catalog: Arc<Catalog>,
        sink: Arc<dyn BookingSink>,
        schedule: SlotSchedule,
        date: NaiveDate,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        debug!(session_id = %id, %date, "Booking session created");
        BookingSession {
            id,
            wizard: WizardState::with_schedule(date, schedule),
            catalog,
            appointments: Vec::new(),
            sink,
            token: CancellationToken::new(),
            emission: None,
        }
    }

    /// Loads the catalog from `source` and starts a session.
    ///
    /// Returns `None` if `token` is cancelled before the load resolves.
    pub async fn open(
        source: Arc<dyn DataSource>,
        sink: Arc<dyn BookingSink>,
        schedule: SlotSchedule,
        date: NaiveDate,
        token: CancellationToken,
    ) -> Option<Self> {
        let snapshot = CatalogLoader::new(source, token.clone()).load(date).await?;

        let mut session = Self::new(Arc::new(snapshot.catalog), sink, schedule, date);
        session.appointments = snapshot.appointments;
        session.token = token;
        Some(session)
    }

    /// Replaces the known appointments (e.g. after changing the date).
    pub fn with_appointments(mut self, appointments: Vec<Appointment>) -> Self {
        self.appointments = appointments;
        self
    }

    /// Re-reads the appointments for the wizard's current date.
    pub async fn reload_appointments(&mut self, source: &dyn DataSource) -> BookingResult<()> {
        self.appointments = source.appointments_on(self.wizard.date()).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Read side
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn services_by_category(&self) -> Vec<CategoryGroup<&Service>> {
        self.catalog.services_by_category()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self.wizard.cart())
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        is_step_valid(step, &self.wizard)
    }

    pub fn can_navigate_to(&self, step: WizardStep) -> bool {
        self.wizard.can_navigate_to(step)
    }

    /// The schedule's slots, bucketed by hour.
    pub fn time_slots(&self) -> Vec<SlotBucket> {
        self.wizard.schedule().buckets()
    }

    /// Slots the selected employee is free for, given the primary service.
    ///
    /// Without an employee or service every slot is offered.
    pub fn available_slots(&self) -> Vec<String> {
        match self.booking_target() {
            Some((employee_id, duration)) => available_slots(
                self.wizard.schedule(),
                self.wizard.date(),
                &self.appointments,
                employee_id,
                duration,
            ),
            None => self.wizard.schedule().all_slots(),
        }
    }

    fn booking_target(&self) -> Option<(&str, u32)> {
        let employee_id = self.wizard.employee_id()?;
        let line = self.wizard.cart().primary_line()?;
        Some((employee_id, line.service.duration_minutes))
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    pub fn adjust_quantity(&mut self, service_id: &str, delta: i32) -> BookingResult<()> {
        let service = self.catalog.service(service_id)?;
        self.wizard.adjust_quantity(service, delta)?;
        Ok(())
    }

    pub fn remove_service(&mut self, service_id: &str) -> BookingResult<bool> {
        Ok(self.wizard.remove_service(service_id)?)
    }

    pub fn select_employee(&mut self, employee_id: &str) -> BookingResult<()> {
        let employee = self.catalog.employee(employee_id)?;
        self.wizard.select_employee(employee)?;
        Ok(())
    }

    /// Changes the date. Known appointments are for the old date until
    /// [`reload_appointments`](Self::reload_appointments) runs.
    pub fn select_date(&mut self, date: NaiveDate) -> BookingResult<()> {
        self.wizard.select_date(date)?;
        Ok(())
    }

    /// Selects a slot, rejecting one the employee is already booked in.
    pub fn select_time_slot(&mut self, slot: &str) -> BookingResult<()> {
        if let Some((employee_id, duration)) = self.booking_target() {
            if let Ok(start) = self.wizard.schedule().start_at(self.wizard.date(), slot.trim()) {
                if let Some(taken) = find_conflict(&self.appointments, employee_id, start, duration) {
                    return Err(CoreError::SlotConflict {
                        employee_id: employee_id.to_string(),
                        start,
                        appointment_id: taken.id.clone(),
                    }
                    .into());
                }
            }
        }
        self.wizard.select_time_slot(slot)?;
        Ok(())
    }

    pub fn clear_time_slot(&mut self) -> BookingResult<()> {
        Ok(self.wizard.clear_time_slot()?)
    }

    pub fn set_customer(&mut self, customer: CustomerInfo) -> BookingResult<()> {
        Ok(self.wizard.set_customer(customer)?)
    }

    pub fn go_to(&mut self, step: WizardStep) -> BookingResult<()> {
        Ok(self.wizard.go_to(step)?)
    }

    /// Advances the wizard; on DETAILS → CONFIRM the record is handed to the
    /// sink in the background.
    pub fn next(&mut self) -> BookingResult<Transition> {
        let transition = self.wizard.next()?;
        match &transition {
            Transition::Advanced(step) => {
                debug!(session_id = %self.id, step = %step, "Wizard advanced");
            }
            Transition::Completed(record) => {
                info!(
                    session_id = %self.id,
                    employee_id = %record.employee_id,
                    start_at = %record.start_at,
                    "Booking confirmed"
                );
                self.spawn_emission(record.clone());
            }
        }
        Ok(transition)
    }

    fn spawn_emission(&mut self, record: BookingRecord) {
        let sink = Arc::clone(&self.sink);
        let session_id = self.id.clone();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(session_id = %session_id, "No async runtime; booking not handed off");
            return;
        };

        self.emission = Some(runtime.spawn(async move {
            match sink.emit(record).await {
                Ok(()) => debug!(session_id = %session_id, "Booking handed off"),
                Err(e) => warn!(session_id = %session_id, error = %e, "Booking hand-off failed"),
            }
        }));
    }

    /// Waits for an in-flight hand-off, if any.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.emission.take() {
            if let Err(e) = handle.await {
                warn!(session_id = %self.id, error = %e, "Booking hand-off task panicked");
            }
        }
    }

    /// Cancels a pending catalog load tied to this session.
    pub fn close(&self) {
        debug!(session_id = %self.id, "Booking session closed");
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("id", &self.id)
            .field("wizard", &self.wizard)
            .field("appointments", &self.appointments.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::loader::tests::SlowSource;
    use crate::sink::{ChannelSink, DataSourceSink};
    use crate::source::test_support::{at, friday, record};
    use crate::source::MemoryDataSource;
    use salon_core::Money;
    use std::time::Duration;

    async fn demo_session() -> (BookingSession, tokio::sync::mpsc::Receiver<BookingRecord>) {
        let (sink, rx) = ChannelSink::new(4);
        let session = BookingSession::open(
            Arc::new(MemoryDataSource::demo()),
            Arc::new(sink),
            SlotSchedule::default(),
            friday(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        (session, rx)
    }

    fn fill_to_details(session: &mut BookingSession) {
        session.adjust_quantity("gel-manicure", 1).unwrap();
        session.next().unwrap();
        session.select_employee("mai").unwrap();
        session.next().unwrap();
        session.select_time_slot("10:00").unwrap();
        session.next().unwrap();
        session
            .set_customer(CustomerInfo::new("Ana", "ana@example.com", "555-0101"))
            .unwrap();
    }

    #[tokio::test]
    async fn test_full_flow_hands_off_record() {
        let (mut session, mut rx) = demo_session().await;
        assert_eq!(session.services_by_category().len(), 4);

        fill_to_details(&mut session);
        assert_eq!(session.totals().total_price, Money::from_major(40));

        let transition = session.next().unwrap();
        let Transition::Completed(record) = transition else {
            panic!("expected completion");
        };
        assert_eq!(record.start_at, at(10, 0));
        assert_eq!(record.duration_minutes, 45);

        session.flush().await;
        assert_eq!(rx.recv().await, Some(record));
        assert_eq!(session.step(), WizardStep::Confirm);
        assert!(matches!(
            session.next(),
            Err(BookingError::Core(CoreError::BookingCompleted))
        ));
    }

    #[tokio::test]
    async fn test_unknown_ids_rejected() {
        let (mut session, _rx) = demo_session().await;

        assert!(matches!(
            session.adjust_quantity("nope", 1),
            Err(BookingError::Core(CoreError::ServiceNotFound(_)))
        ));
        assert!(matches!(
            session.select_employee("zoe"),
            Err(BookingError::Core(CoreError::EmployeeNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_taken_slots_hidden_and_rejected() {
        let (sink, _rx) = ChannelSink::new(1);
        let existing = MemoryDataSource::demo();
        existing
            .add_appointment(record("bo@example.com", "mai", "gel-manicure", at(10, 0)))
            .await
            .unwrap();
        let taken = existing.list_appointments().await.unwrap();

        let mut session = BookingSession::new(
            Arc::new(existing.catalog().clone()),
            Arc::new(sink),
            SlotSchedule::default(),
            friday(),
        )
        .with_appointments(taken);

        // No employee yet: everything is offered.
        assert_eq!(session.available_slots().len(), 40);

        session.adjust_quantity("gel-manicure", 1).unwrap();
        session.select_employee("mai").unwrap();
        let slots = session.available_slots();
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(!slots.contains(&"09:30".to_string()));
        assert!(slots.contains(&"09:15".to_string()));
        assert!(slots.contains(&"10:45".to_string()));

        let err = session.select_time_slot("10:15").unwrap_err();
        assert!(err.is_slot_conflict());

        session.select_employee("lena").unwrap();
        session.select_time_slot("10:15").unwrap();
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        let mut session = BookingSession::new(
            Arc::new(salon_core::demo_catalog()),
            Arc::new(sink),
            SlotSchedule::default(),
            friday(),
        );

        fill_to_details(&mut session);
        assert!(matches!(session.next(), Ok(Transition::Completed(_))));
        session.flush().await;
        assert!(session.wizard().is_complete());
    }

    #[tokio::test]
    async fn test_data_source_sink_persists_booking() {
        let source = Arc::new(MemoryDataSource::demo());
        let mut session = BookingSession::open(
            source.clone(),
            Arc::new(DataSourceSink::new(source.clone())),
            SlotSchedule::default(),
            friday(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        fill_to_details(&mut session);
        session.next().unwrap();
        session.flush().await;

        let stored = source.appointments_on(friday()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].employee_id, "mai");

        // A second session sees the booking and hides the slot.
        let mut second = BookingSession::open(
            source.clone(),
            Arc::new(DataSourceSink::new(source)),
            SlotSchedule::default(),
            friday(),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        second.adjust_quantity("gel-manicure", 1).unwrap();
        second.select_employee("mai").unwrap();
        assert!(!second.available_slots().contains(&"10:00".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_cancelled_before_load() {
        let token = CancellationToken::new();
        let (sink, _rx) = ChannelSink::new(1);
        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                token.cancel();
            })
        };

        let session = BookingSession::open(
            Arc::new(SlowSource::new(Duration::from_secs(2))),
            Arc::new(sink),
            SlotSchedule::default(),
            friday(),
            token,
        )
        .await;

        assert!(session.is_none());
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_marks_session_closed() {
        let (session, _rx) = demo_session().await;
        assert!(!session.is_closed());
        session.close();
        assert!(session.is_closed());
    }
}
