//! Baskets as read from the basket store.

use common::{ProductId, UserId};
use serde::{Deserialize, Serialize};

/// One product + quantity entry in a basket.
///
/// Carries no price: prices are resolved from the catalog at checkout
/// time, never trusted from the basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    /// The product being bought.
    pub product_id: ProductId,

    /// Quantity, always greater than zero.
    pub quantity: u32,
}

impl BasketLine {
    /// Creates a new basket line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A user's basket: an ordered sequence of lines.
///
/// Owned by the basket store; read-only to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    pub user_id: UserId,
    pub lines: Vec<BasketLine>,
}

impl Basket {
    /// Creates a basket for a user.
    pub fn new(user_id: impl Into<UserId>, lines: Vec<BasketLine>) -> Self {
        Self {
            user_id: user_id.into(),
            lines,
        }
    }

    /// Creates an empty basket, the store's answer for unknown users.
    pub fn empty(user_id: impl Into<UserId>) -> Self {
        Self::new(user_id, Vec::new())
    }

    /// Returns true if the basket has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
