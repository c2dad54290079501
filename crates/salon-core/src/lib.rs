//! # salon-core: Pure Booking Logic
//!
//! This crate is the **heart** of the salon booking flow. It contains the
//! wizard, cart math and scheduling rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Salon Booking Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host (CLI / webview / web)                      │   │
//! │  │   Service ──► Employee ──► Time ──► Details ──► Confirm         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              salon-booking (BookingSession)                     │   │
//! │  │    DataSource (memory | sqlite), BookingSink, CatalogLoader     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │  wizard   │  │   slots   │  │   │
//! │  │   │  Service  │  │   Cart    │  │ WizardStep│  │ SlotBucket│  │   │
//! │  │   │ Employee  │  │ CartLine  │  │ is_valid  │  │ Schedule  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Service, Employee, Appointment, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart lines, quantity adjustment, totals
//! - [`catalog`] - Immutable service/employee catalog and category grouping
//! - [`demo`] - Demo catalog for the in-memory source and seeding
//! - [`slots`] - Fixed-interval time-slot generation
//! - [`wizard`] - Step validator and the five-step booking state machine
//! - [`schedule`] - Double-booking detection
//! - [`stats`] - Daily and weekly aggregation
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use salon_core::slots::generate_time_slots;
//!
//! let buckets = generate_time_slots(9, 18, 15);
//! assert_eq!(buckets.len(), 10);
//! assert_eq!(buckets[0].slots, vec!["09:00", "09:15", "09:30", "09:45"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod demo;
pub mod error;
pub mod money;
pub mod schedule;
pub mod slots;
pub mod stats;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use catalog::{group_by_category, Catalog, Categorized, CategoryGroup};
pub use demo::demo_catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use slots::{generate_time_slots, SlotBucket, SlotSchedule};
pub use types::*;
pub use wizard::{is_step_valid, Transition, WizardState, WizardStep};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// First bookable hour of the day (inclusive).
pub const DEFAULT_OPENING_HOUR: u32 = 9;

/// Last hour that still gets a bucket of slots (inclusive).
pub const DEFAULT_CLOSING_HOUR: u32 = 18;

/// Width of a bookable slot in minutes.
pub const SLOT_INTERVAL_MINUTES: u32 = 15;
