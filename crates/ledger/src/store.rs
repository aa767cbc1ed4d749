//! The order ledger contract.

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};

use crate::Result;

/// Durable mapping from order id to [`Order`].
///
/// Orders are created exactly once and never deleted; after creation
/// only the status moves, through [`OrderLedger::update_status`].
/// Implementations must support concurrent `create` calls for distinct
/// ids without corruption, and must serialize concurrent
/// `update_status` calls on the same id.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Persists a new order.
    ///
    /// Fails with [`crate::LedgerError::DuplicateOrderId`] if the id is
    /// already present.
    async fn create(&self, order: Order) -> Result<()>;

    /// Loads an order by id, `None` if absent.
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Lists all orders for a user, oldest first.
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Order>>;

    /// Applies a status transition and returns the updated order.
    ///
    /// A pure status change: lines and total are never touched. Fails
    /// with [`crate::LedgerError::NotFound`] for unknown ids and
    /// [`crate::LedgerError::Transition`] for moves the status machine
    /// forbids.
    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order>;
}
