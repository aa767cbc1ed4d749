use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};
use tokio::sync::{Mutex, RwLock};

use crate::{LedgerError, Result, store::OrderLedger};

/// In-memory order ledger.
///
/// Each order sits behind its own mutex, so status updates for one
/// order never block work on another; the outer lock only guards the
/// map structure itself.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    orders: Arc<RwLock<HashMap<OrderId, Arc<Mutex<Order>>>>>,
}

impl InMemoryLedger {
    /// Creates a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderLedger for InMemoryLedger {
    async fn create(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;

        if orders.contains_key(&order.order_id) {
            return Err(LedgerError::DuplicateOrderId(order.order_id));
        }

        metrics::counter!("ledger_orders_created_total").increment(1);
        orders.insert(order.order_id, Arc::new(Mutex::new(order)));
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        let slot = {
            let orders = self.orders.read().await;
            orders.get(&order_id).cloned()
        };

        match slot {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let slots: Vec<_> = {
            let orders = self.orders.read().await;
            orders.values().cloned().collect()
        };

        let mut result = Vec::new();
        for slot in slots {
            let order = slot.lock().await;
            if &order.user_id == user_id {
                result.push(order.clone());
            }
        }
        result.sort_by_key(|o| o.created_at);
        Ok(result)
    }

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order> {
        let slot = {
            let orders = self.orders.read().await;
            orders
                .get(&order_id)
                .cloned()
                .ok_or(LedgerError::NotFound(order_id))?
        };

        // Transition under the per-order lock so concurrent updates
        // for the same id serialize.
        let mut order = slot.lock().await;
        let updated = order.with_status(status)?;
        *order = updated.clone();
        Ok(updated)
    }
}
