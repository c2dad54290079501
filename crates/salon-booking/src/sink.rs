//! # Booking Sinks
//!
//! Where a completed booking goes once the wizard reaches CONFIRM.
//!
//! ```text
//!  WizardState::next() ──► Transition::Completed(record)
//!                                   │  tokio::spawn
//!                                   ▼
//!                           dyn BookingSink::emit
//!                     ┌─────────────┴──────────────┐
//!                     ▼                            ▼
//!              DataSourceSink                 ChannelSink
//!          (add_appointment)            (mpsc to host task)
//! ```
//!
//! Emission is fire-and-forget: the session logs a failed `emit` and moves
//! on.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{BookingError, BookingResult};
use crate::source::DataSource;
use salon_core::BookingRecord;

#[async_trait]
pub trait BookingSink: Send + Sync {
    async fn emit(&self, record: BookingRecord) -> BookingResult<()>;
}

/// Persists bookings through a [`DataSource`].
#[derive(Clone)]
pub struct DataSourceSink {
    source: Arc<dyn DataSource>,
}

impl DataSourceSink {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        DataSourceSink { source }
    }
}

#[async_trait]
impl BookingSink for DataSourceSink {
    async fn emit(&self, record: BookingRecord) -> BookingResult<()> {
        let appointment = self.source.add_appointment(record).await?;
        debug!(id = %appointment.id, source = self.source.name(), "Booking persisted");
        Ok(())
    }
}

/// Forwards bookings to a receiver owned by the host.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<BookingRecord>,
}

impl ChannelSink {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<BookingRecord>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (ChannelSink { tx }, rx)
    }
}

#[async_trait]
impl BookingSink for ChannelSink {
    async fn emit(&self, record: BookingRecord) -> BookingResult<()> {
        self.tx.send(record).await.map_err(|_| BookingError::SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::test_support::{at, record};
    use crate::source::MemoryDataSource;

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new(4);
        let booking = record("ana@example.com", "mai", "gel-manicure", at(10, 0));

        sink.emit(booking.clone()).await.unwrap();
        assert_eq!(rx.recv().await, Some(booking));
    }

    #[tokio::test]
    async fn test_channel_sink_closed() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);

        let err = sink
            .emit(record("ana@example.com", "mai", "gel-manicure", at(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::SinkClosed));
    }

    #[tokio::test]
    async fn test_data_source_sink_persists() {
        let source = Arc::new(MemoryDataSource::demo());
        let sink = DataSourceSink::new(source.clone());

        sink.emit(record("ana@example.com", "mai", "gel-manicure", at(10, 0)))
            .await
            .unwrap();
        assert_eq!(source.list_appointments().await.unwrap().len(), 1);

        let err = sink
            .emit(record("bo@example.com", "mai", "gel-manicure", at(10, 0)))
            .await
            .unwrap_err();
        assert!(err.is_slot_conflict());
    }
}
