//! # salon-booking: Booking Sessions for the Salon
//!
//! Binds the pure wizard from `salon-core` to a data source and a booking
//! sink.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  booking-cli / other hosts                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 salon-booking (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   BookingSession ──► CatalogLoader ──► dyn DataSource           │   │
//! │  │        │                                 ├── MemoryDataSource   │   │
//! │  │        │                                 └── SqliteDataSource ──┼───┼─► salon-db
//! │  │        ▼                                                        │   │
//! │  │   dyn BookingSink  (DataSourceSink | ChannelSink)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  salon-core (WizardState, Cart, SlotSchedule, Catalog)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`session`] - One wizard pass with catalog-resolved actions
//! - [`loader`] - Cancellation-aware catalog load
//! - [`source`] - `DataSource` trait, in-memory and SQLite implementations
//! - [`sink`] - `BookingSink` trait and implementations
//! - [`config`] - `BookingConfig` (TOML + `SALON_*` env)
//! - [`error`] - `BookingError`

pub mod config;
pub mod error;
pub mod loader;
pub mod session;
pub mod sink;
pub mod source;

pub use config::{BookingConfig, SourceKind};
pub use error::{BookingError, BookingResult};
pub use loader::{CatalogLoader, Snapshot};
pub use session::BookingSession;
pub use sink::{BookingSink, ChannelSink, DataSourceSink};
pub use source::{open_source, DataSource, MemoryDataSource, SqliteDataSource};
