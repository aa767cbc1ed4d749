//! Orders and the order status machine.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::basket::BasketLine;
use crate::catalog::CatalogEntry;

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Created ──┬──► Paid
///           ├──► PaymentFailed ──► Cancelled
///           └──► Cancelled
/// ```
///
/// `Paid` and `Cancelled` are terminal. An order is never deleted once
/// persisted; only its status moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Persisted with a pinned total, payment outcome not yet known.
    #[default]
    Created,

    /// Payment authorized (terminal state).
    Paid,

    /// Payment declined, errored or unreachable; re-drivable
    /// administratively.
    PaymentFailed,

    /// Cancelled through the administrative path (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if an order may move from this status to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Created, OrderStatus::Paid)
                | (OrderStatus::Created, OrderStatus::PaymentFailed)
                | (OrderStatus::Created, OrderStatus::Cancelled)
                | (OrderStatus::PaymentFailed, OrderStatus::Cancelled)
        )
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Paid => "Paid",
            OrderStatus::PaymentFailed => "PaymentFailed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(OrderStatus::Created),
            "Paid" => Ok(OrderStatus::Paid),
            "PaymentFailed" => Ok(OrderStatus::PaymentFailed),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// A status transition that the machine above does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid order status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// A basket line with its price pinned at checkout time.
///
/// The unit price is copied from the catalog when the order is built and
/// never re-read, so later catalog price changes do not touch the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLine {
    /// Pins a basket line against the catalog entry it resolved to.
    pub fn pin(line: &BasketLine, entry: &CatalogEntry) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: entry.unit_price,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A priced order, owned exclusively by the order ledger once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,

    /// Sum of line totals at creation time; never recomputed.
    pub total: Money,

    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order in `Created` status with the total pinned from
    /// the given lines.
    pub fn create(order_id: OrderId, user_id: UserId, lines: Vec<OrderLine>) -> Self {
        let total = lines.iter().map(OrderLine::line_total).sum();
        Self {
            order_id,
            user_id,
            lines,
            total,
            status: OrderStatus::Created,
            created_at: Utc::now(),
        }
    }

    /// Returns a copy of this order moved to `next`, leaving lines and
    /// total untouched.
    ///
    /// This is the only way an order changes after creation. Fails if
    /// the status machine forbids the move.
    pub fn with_status(&self, next: OrderStatus) -> Result<Order, InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        let mut updated = self.clone();
        updated.status = next;
        Ok(updated)
    }
}
