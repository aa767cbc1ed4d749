//! Read and administrative access to settled orders.

use common::{OrderId, UserId};
use domain::{Order, OrderStatus};
use ledger::OrderLedger;

use crate::error::Result;

/// Order lookups and manual status moves, outside the checkout
/// workflow.
///
/// Thin by design: everything interesting lives in the ledger and the
/// status machine. This type adds tracing and the crate's error type.
pub struct OrderQueries<L: OrderLedger> {
    ledger: L,
}

impl<L: OrderLedger> OrderQueries<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Loads an order by id, `None` if no such order exists.
    #[tracing::instrument(skip(self), fields(order = %order_id))]
    pub async fn get(&self, order_id: OrderId) -> Result<Option<Order>> {
        Ok(self.ledger.get(order_id).await?)
    }

    /// Lists a user's orders, oldest first. Unknown users get an empty
    /// list, not an error.
    #[tracing::instrument(skip(self), fields(user = %user_id))]
    pub async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        Ok(self.ledger.list_by_user(user_id).await?)
    }

    /// Moves an order to a new status, e.g. an operator cancelling a
    /// `PaymentFailed` order. The status machine decides legality.
    #[tracing::instrument(skip(self), fields(order = %order_id, status = %status))]
    pub async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order> {
        let order = self.ledger.update_status(order_id, status).await?;
        tracing::info!(order = %order_id, status = %order.status, "order status updated");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, ProductId, UserId};
    use domain::OrderLine;
    use ledger::InMemoryLedger;

    fn order_for(user: &str) -> Order {
        let line = OrderLine {
            product_id: ProductId::new(1),
            quantity: 1,
            unit_price: Money::from_cents(1000),
        };
        Order::create(OrderId::new(), UserId::new(user), vec![line])
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_order() {
        let queries = OrderQueries::new(InMemoryLedger::new());
        assert!(queries.get(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_by_user_is_empty_for_unknown_user() {
        let queries = OrderQueries::new(InMemoryLedger::new());
        let orders = queries.list_by_user(&UserId::new("ghost")).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn cancelling_a_payment_failed_order() {
        let ledger = InMemoryLedger::new();
        let order = order_for("u1");
        ledger.create(order.clone()).await.unwrap();
        ledger
            .update_status(order.order_id, OrderStatus::PaymentFailed)
            .await
            .unwrap();

        let queries = OrderQueries::new(ledger);
        let cancelled = queries
            .update_status(order.order_id, OrderStatus::Cancelled)
            .await
            .unwrap();

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn illegal_transition_is_rejected() {
        let ledger = InMemoryLedger::new();
        let order = order_for("u1");
        ledger.create(order.clone()).await.unwrap();
        ledger
            .update_status(order.order_id, OrderStatus::Paid)
            .await
            .unwrap();

        let queries = OrderQueries::new(ledger);
        let result = queries
            .update_status(order.order_id, OrderStatus::Cancelled)
            .await;

        assert!(result.is_err());
    }
}
