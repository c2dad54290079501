//! # Cart
//!
//! The services selected in the SERVICE step, with quantities.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Host Action              Cart Method              Cart Change          │
//! │  ───────────              ───────────              ───────────          │
//! │                                                                         │
//! │  Click service ──────────► adjust_quantity(+1) ──► push line (qty 1)   │
//! │                                                                         │
//! │  Click "+" ──────────────► adjust_quantity(+1) ──► line.qty += 1       │
//! │                                                                         │
//! │  Click "-" ──────────────► adjust_quantity(-1) ──► line.qty -= 1       │
//! │                                                    (qty 0 → removed)    │
//! │                                                                         │
//! │  Click remove ───────────► remove(id) ───────────► line dropped        │
//! │                                                                         │
//! │  Summary ────────────────► totals() ─────────────► (read only)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by service id (selecting again bumps the quantity)
//! - A line never persists with quantity 0
//! - The first line is the booking's primary service

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Service;

/// One selected service and its quantity.
///
/// The service is a frozen copy of the catalog entry at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub service: Service,
    pub quantity: u32,
}

impl CartLine {
    /// Price × quantity.
    pub fn line_total(&self) -> Money {
        self.service.price() * self.quantity
    }

    /// Points earned × quantity.
    pub fn line_points(&self) -> i64 {
        self.service.points() * self.quantity as i64
    }
}

/// The booking cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Applies a signed quantity change for `service`.
    ///
    /// ## Behavior
    /// - No line and `delta > 0`: inserts a line of quantity 1. A larger
    ///   delta only creates presence; it is not applied on top.
    /// - No line and `delta <= 0`: no-op.
    /// - Existing line: adds `delta`; a result `<= 0` removes the line.
    ///   Growth saturates at `u32::MAX`.
    pub fn adjust_quantity(&mut self, service: &Service, delta: i32) {
        let Some(index) = self.position(&service.id) else {
            if delta > 0 {
                self.lines.push(CartLine {
                    service: service.clone(),
                    quantity: 1,
                });
            }
            return;
        };

        let new_qty = self.lines[index].quantity as i64 + delta as i64;
        if new_qty <= 0 {
            self.lines.remove(index);
            return;
        }
        self.lines[index].quantity = u32::try_from(new_qty).unwrap_or(u32::MAX);
    }

    /// Removes the line for `service_id`. Returns whether a line was removed.
    pub fn remove(&mut self, service_id: &str) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.service.id != service_id);
        self.lines.len() != initial_len
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, service_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.service.id == service_id)
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.position(service_id).is_some()
    }

    /// The first selected line; its service is the one that gets booked.
    pub fn primary_line(&self) -> Option<&CartLine> {
        self.lines.first()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ price × quantity.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Σ points_earned × quantity (missing points count as 0).
    pub fn total_points(&self) -> i64 {
        self.lines.iter().map(CartLine::line_points).sum()
    }

    /// Σ quantity.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ duration × quantity, in minutes.
    pub fn total_duration_minutes(&self) -> u32 {
        self.lines
            .iter()
            .map(|l| l.service.duration_minutes * l.quantity)
            .sum()
    }

    fn position(&self, service_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.service.id == service_id)
    }
}

/// Cart totals summary for hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub total_price: Money,
    pub total_points: i64,
    pub total_items_count: u32,
    pub total_duration_minutes: u32,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            total_price: cart.total_price(),
            total_points: cart.total_points(),
            total_items_count: cart.total_items(),
            total_duration_minutes: cart.total_duration_minutes(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
