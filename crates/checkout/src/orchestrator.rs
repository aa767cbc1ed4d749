//! The checkout workflow.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::{OrderId, UserId};
use domain::{Order, OrderLine, OrderStatus};
use futures_util::future;
use ledger::{LedgerError, OrderLedger};

use crate::clients::{BasketClient, CatalogClient, PaymentClient};
use crate::error::{CheckoutError, Result, Upstream};

/// Tunables for a checkout run.
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    /// Upper bound on every single remote call. Exceeding it is treated
    /// identically to a transport failure.
    pub call_timeout: Duration,

    /// When set, a successfully paid checkout empties the user's basket
    /// afterwards. Off by default: the original flow leaves the basket
    /// in place, so repeated checkouts re-charge the same contents.
    pub clear_basket_after_payment: bool,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
            clear_basket_after_payment: false,
        }
    }
}

/// Drives the basket → catalog → ledger → payment workflow.
///
/// Each remote dependency can fail independently; the orchestrator
/// leaves the system in one of a small set of well-defined states. The
/// ledger write of the `Created` order is the commit point: before it,
/// any failure aborts with zero persisted state; after it, a payment
/// failure settles the order to `PaymentFailed` rather than erroring.
pub struct CheckoutOrchestrator<L: OrderLedger> {
    ledger: L,
    basket: Arc<dyn BasketClient>,
    catalog: Arc<dyn CatalogClient>,
    payment: Arc<dyn PaymentClient>,
    options: CheckoutOptions,
}

impl<L: OrderLedger> CheckoutOrchestrator<L> {
    /// Creates an orchestrator with default options.
    pub fn new(
        ledger: L,
        basket: Arc<dyn BasketClient>,
        catalog: Arc<dyn CatalogClient>,
        payment: Arc<dyn PaymentClient>,
    ) -> Self {
        Self::with_options(ledger, basket, catalog, payment, CheckoutOptions::default())
    }

    /// Creates an orchestrator with explicit options.
    pub fn with_options(
        ledger: L,
        basket: Arc<dyn BasketClient>,
        catalog: Arc<dyn CatalogClient>,
        payment: Arc<dyn PaymentClient>,
        options: CheckoutOptions,
    ) -> Self {
        Self {
            ledger,
            basket,
            catalog,
            payment,
            options,
        }
    }

    /// Returns a reference to the ledger this orchestrator writes to.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Executes a checkout for the given user and returns the settled
    /// order.
    ///
    /// Repeated calls for the same user with an unchanged basket create
    /// distinct orders; there is no deduplication.
    #[tracing::instrument(skip(self), fields(user = %user_id))]
    pub async fn checkout(&self, user_id: UserId) -> Result<Order> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let start = std::time::Instant::now();

        let result = self.run(user_id).await;

        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());
        match &result {
            Ok(order) => {
                tracing::info!(order_id = %order.order_id, status = %order.status, "checkout settled");
            }
            Err(err) => {
                tracing::warn!(error = %err, "checkout aborted");
            }
        }
        result
    }

    async fn run(&self, user_id: UserId) -> Result<Order> {
        // 1. Fetch the basket. Absent and empty are the same business
        // outcome: nothing to check out, nothing persisted.
        let basket = self
            .call(Upstream::Basket, self.basket.basket(&user_id))
            .await?;
        let basket = match basket {
            Some(b) if !b.is_empty() => b,
            _ => return Err(CheckoutError::EmptyBasket(user_id)),
        };

        // 2. Resolve every line against the catalog before committing
        // anything. The fetches are independent, so they fan out
        // concurrently; join_all drains them all, and the first failure
        // in basket order decides the error.
        let fetches = basket.lines.iter().map(|line| {
            let catalog = Arc::clone(&self.catalog);
            let timeout = self.options.call_timeout;
            async move {
                match tokio::time::timeout(timeout, catalog.product(line.product_id)).await {
                    Ok(Ok(entry)) => Ok(entry),
                    Ok(Err(e)) => Err(CheckoutError::upstream(Upstream::Catalog, e)),
                    Err(_) => Err(CheckoutError::Upstream {
                        which: Upstream::Catalog,
                        reason: "request timed out".to_string(),
                    }),
                }
            }
        });
        let resolved = future::join_all(fetches).await;

        // 3. Pin prices and compute the total.
        let mut lines = Vec::with_capacity(basket.lines.len());
        for (line, entry) in basket.lines.iter().zip(resolved) {
            match entry? {
                Some(entry) => lines.push(OrderLine::pin(line, &entry)),
                None => return Err(CheckoutError::ProductNotFound(line.product_id)),
            }
        }

        // 4. Persist the order as Created. From here on the order
        // exists and is queryable regardless of payment outcome.
        let order = Order::create(OrderId::new(), user_id.clone(), lines);
        self.ledger.create(order.clone()).await.map_err(|e| {
            if matches!(e, LedgerError::DuplicateOrderId(_)) {
                tracing::error!(order_id = %order.order_id, "order id collision on create");
            }
            CheckoutError::from(e)
        })?;
        tracing::info!(order_id = %order.order_id, total = %order.total, "order committed");

        // 5. Request payment. Any non-Paid answer and any transport
        // failure settle the order to PaymentFailed; no retry, no
        // rollback.
        let paid = match self
            .call(
                Upstream::Payment,
                self.payment.authorize(order.order_id, order.total),
            )
            .await
        {
            Ok(outcome) if outcome.is_paid() => true,
            Ok(outcome) => {
                tracing::warn!(
                    order_id = %order.order_id,
                    status = %outcome.status,
                    message = %outcome.message,
                    "payment not authorized"
                );
                false
            }
            Err(err) => {
                tracing::warn!(order_id = %order.order_id, error = %err, "payment call failed");
                false
            }
        };

        let final_status = if paid {
            metrics::counter!("checkout_paid_total").increment(1);
            OrderStatus::Paid
        } else {
            metrics::counter!("checkout_payment_failed_total").increment(1);
            OrderStatus::PaymentFailed
        };
        let settled = self
            .ledger
            .update_status(order.order_id, final_status)
            .await?;

        // 6. Optionally empty the basket now that the charge landed.
        // Failures here are logged, not surfaced: the order is already
        // settled.
        if paid && self.options.clear_basket_after_payment {
            if let Err(err) = self
                .call(Upstream::Basket, self.basket.clear(&user_id))
                .await
            {
                tracing::warn!(user = %user_id, error = %err, "failed to clear basket after payment");
            }
        }

        Ok(settled)
    }

    async fn call<T>(
        &self,
        which: Upstream,
        fut: impl Future<Output = std::result::Result<T, crate::error::ClientError>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.options.call_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CheckoutError::upstream(which, e)),
            Err(_) => Err(CheckoutError::Upstream {
                which,
                reason: "request timed out".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::payment::AuthorizerMode;
    use crate::clients::{InMemoryBasketStore, InMemoryCatalogStore, InMemoryPaymentAuthorizer};
    use crate::error::ClientError;
    use async_trait::async_trait;
    use common::{Money, ProductId};
    use domain::{BasketLine, CatalogEntry};
    use ledger::InMemoryLedger;

    fn setup() -> (
        CheckoutOrchestrator<InMemoryLedger>,
        InMemoryLedger,
        InMemoryBasketStore,
        InMemoryCatalogStore,
        InMemoryPaymentAuthorizer,
    ) {
        let ledger = InMemoryLedger::new();
        let basket = InMemoryBasketStore::new();
        let catalog = InMemoryCatalogStore::new();
        let payment = InMemoryPaymentAuthorizer::new();

        let orchestrator = CheckoutOrchestrator::new(
            ledger.clone(),
            Arc::new(basket.clone()),
            Arc::new(catalog.clone()),
            Arc::new(payment.clone()),
        );

        (orchestrator, ledger, basket, catalog, payment)
    }

    fn seed_catalog(catalog: &InMemoryCatalogStore) {
        catalog.insert(CatalogEntry::new(1u64, "Widget", Money::from_cents(1000), 10));
        catalog.insert(CatalogEntry::new(2u64, "Gadget", Money::from_cents(500), 10));
    }

    #[tokio::test]
    async fn happy_path_settles_to_paid_with_pinned_total() {
        let (orchestrator, ledger, basket, catalog, payment) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 2)]);

        let order = orchestrator.checkout(UserId::new("u1")).await.unwrap();

        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.total.cents(), 2000);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].unit_price.cents(), 1000);

        // The authorizer saw exactly the pinned total.
        assert_eq!(payment.charge_count(), 1);
        assert_eq!(payment.last_amount(), Some(Money::from_cents(2000)));

        // And the ledger agrees.
        let stored = ledger.get(order.order_id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn total_is_pinned_at_checkout_time() {
        let (orchestrator, _, basket, catalog, _) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);

        let order = orchestrator.checkout(UserId::new("u1")).await.unwrap();

        // A later price change must not touch the persisted order.
        catalog.insert(CatalogEntry::new(1u64, "Widget", Money::from_cents(9999), 10));
        let reloaded = orchestrator
            .ledger()
            .get(order.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.total.cents(), 1000);
    }

    #[tokio::test]
    async fn absent_basket_is_empty_basket_error() {
        let (orchestrator, ledger, _, catalog, payment) = setup();
        seed_catalog(&catalog);

        let result = orchestrator.checkout(UserId::new("nobody")).await;

        assert!(matches!(result, Err(CheckoutError::EmptyBasket(_))));
        assert_eq!(ledger.order_count().await, 0);
        assert_eq!(payment.charge_count(), 0);
    }

    #[tokio::test]
    async fn empty_basket_creates_no_order() {
        let (orchestrator, ledger, basket, _, _) = setup();
        basket.set_lines("u1", vec![]);

        let result = orchestrator.checkout(UserId::new("u1")).await;

        assert!(matches!(result, Err(CheckoutError::EmptyBasket(_))));
        assert_eq!(ledger.order_count().await, 0);
    }

    #[tokio::test]
    async fn unresolvable_product_aborts_with_its_id() {
        let (orchestrator, ledger, basket, catalog, payment) = setup();
        seed_catalog(&catalog);
        basket.set_lines(
            "u1",
            vec![BasketLine::new(1u64, 2), BasketLine::new(9u64, 1)],
        );

        let result = orchestrator.checkout(UserId::new("u1")).await;

        match result {
            Err(CheckoutError::ProductNotFound(id)) => assert_eq!(id, ProductId::new(9)),
            other => panic!("expected ProductNotFound, got {other:?}"),
        }
        // All-or-nothing: no partial order, no charge.
        assert_eq!(ledger.order_count().await, 0);
        assert_eq!(payment.charge_count(), 0);
    }

    #[tokio::test]
    async fn declined_payment_settles_to_payment_failed() {
        let (orchestrator, ledger, basket, catalog, payment) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(2u64, 1)]);
        payment.set_mode(AuthorizerMode::Decline);

        let order = orchestrator.checkout(UserId::new("u1")).await.unwrap();

        assert_eq!(order.status, OrderStatus::PaymentFailed);
        assert_eq!(order.total.cents(), 500);

        // The failed order is still queryable afterwards.
        let stored = ledger.get(order.order_id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::PaymentFailed);
    }

    #[tokio::test]
    async fn unreachable_authorizer_settles_to_payment_failed() {
        let (orchestrator, ledger, basket, catalog, payment) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);
        payment.set_mode(AuthorizerMode::Unreachable);

        let order = orchestrator.checkout(UserId::new("u1")).await.unwrap();

        assert_eq!(order.status, OrderStatus::PaymentFailed);
        assert_eq!(ledger.order_count().await, 1);
    }

    #[tokio::test]
    async fn authorizer_error_status_settles_to_payment_failed() {
        let (orchestrator, _, basket, catalog, payment) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);
        payment.set_mode(AuthorizerMode::Error);

        let order = orchestrator.checkout(UserId::new("u1")).await.unwrap();
        assert_eq!(order.status, OrderStatus::PaymentFailed);
    }

    #[tokio::test]
    async fn unreachable_basket_store_aborts_before_any_side_effect() {
        let (orchestrator, ledger, basket, catalog, payment) = setup();
        seed_catalog(&catalog);
        basket.set_fail(true);

        let result = orchestrator.checkout(UserId::new("u1")).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Upstream {
                which: Upstream::Basket,
                ..
            })
        ));
        assert_eq!(ledger.order_count().await, 0);
        assert_eq!(payment.charge_count(), 0);
    }

    #[tokio::test]
    async fn unreachable_catalog_aborts_before_the_commit_point() {
        let (orchestrator, ledger, basket, catalog, _) = setup();
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);
        catalog.set_fail(true);

        let result = orchestrator.checkout(UserId::new("u1")).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Upstream {
                which: Upstream::Catalog,
                ..
            })
        ));
        assert_eq!(ledger.order_count().await, 0);
    }

    /// Catalog client that never answers within any reasonable timeout.
    #[derive(Clone)]
    struct StalledCatalog;

    #[async_trait]
    impl crate::clients::CatalogClient for StalledCatalog {
        async fn product(
            &self,
            _product_id: ProductId,
        ) -> std::result::Result<Option<CatalogEntry>, ClientError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }

        async fn all_products(&self) -> std::result::Result<Vec<CatalogEntry>, ClientError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn catalog_timeout_is_treated_as_transport_failure() {
        let ledger = InMemoryLedger::new();
        let basket = InMemoryBasketStore::new();
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);

        let orchestrator = CheckoutOrchestrator::with_options(
            ledger.clone(),
            Arc::new(basket),
            Arc::new(StalledCatalog),
            Arc::new(InMemoryPaymentAuthorizer::new()),
            CheckoutOptions {
                call_timeout: Duration::from_millis(50),
                ..CheckoutOptions::default()
            },
        );

        let result = orchestrator.checkout(UserId::new("u1")).await;

        assert!(matches!(
            result,
            Err(CheckoutError::Upstream {
                which: Upstream::Catalog,
                ..
            })
        ));
        assert_eq!(ledger.order_count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_checkouts_never_collide_on_order_id() {
        let (orchestrator, ledger, basket, catalog, _) = setup();
        seed_catalog(&catalog);
        for user in ["u1", "u2", "u3", "u4"] {
            basket.set_lines(user, vec![BasketLine::new(1u64, 1)]);
        }

        let orchestrator = Arc::new(orchestrator);
        let mut handles = Vec::new();
        for user in ["u1", "u2", "u3", "u4", "u1", "u2", "u3", "u4"] {
            let orchestrator = Arc::clone(&orchestrator);
            handles.push(tokio::spawn(async move {
                orchestrator.checkout(UserId::new(user)).await.unwrap()
            }));
        }

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let order = handle.await.unwrap();
            assert!(ids.insert(order.order_id), "duplicate order id");
        }
        assert_eq!(ledger.order_count().await, 8);
    }

    #[tokio::test]
    async fn repeated_checkouts_create_distinct_orders() {
        let (orchestrator, ledger, basket, catalog, _) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);

        let first = orchestrator.checkout(UserId::new("u1")).await.unwrap();
        let second = orchestrator.checkout(UserId::new("u1")).await.unwrap();

        assert_ne!(first.order_id, second.order_id);
        assert_eq!(ledger.order_count().await, 2);
    }

    #[tokio::test]
    async fn basket_survives_paid_checkout_by_default() {
        let (orchestrator, _, basket, catalog, _) = setup();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);

        orchestrator.checkout(UserId::new("u1")).await.unwrap();

        let remaining = basket.basket(&UserId::new("u1")).await.unwrap();
        assert!(remaining.is_some());
    }

    #[tokio::test]
    async fn opt_in_clearing_empties_basket_after_paid_checkout() {
        let ledger = InMemoryLedger::new();
        let basket = InMemoryBasketStore::new();
        let catalog = InMemoryCatalogStore::new();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);

        let orchestrator = CheckoutOrchestrator::with_options(
            ledger,
            Arc::new(basket.clone()),
            Arc::new(catalog),
            Arc::new(InMemoryPaymentAuthorizer::new()),
            CheckoutOptions {
                clear_basket_after_payment: true,
                ..CheckoutOptions::default()
            },
        );

        orchestrator.checkout(UserId::new("u1")).await.unwrap();

        let remaining = basket.basket(&UserId::new("u1")).await.unwrap();
        assert!(remaining.is_none());
    }

    #[tokio::test]
    async fn opt_in_clearing_keeps_basket_when_payment_fails() {
        let ledger = InMemoryLedger::new();
        let basket = InMemoryBasketStore::new();
        let catalog = InMemoryCatalogStore::new();
        let payment = InMemoryPaymentAuthorizer::new();
        seed_catalog(&catalog);
        basket.set_lines("u1", vec![BasketLine::new(1u64, 1)]);
        payment.set_mode(AuthorizerMode::Decline);

        let orchestrator = CheckoutOrchestrator::with_options(
            ledger,
            Arc::new(basket.clone()),
            Arc::new(catalog),
            Arc::new(payment),
            CheckoutOptions {
                clear_basket_after_payment: true,
                ..CheckoutOptions::default()
            },
        );

        let order = orchestrator.checkout(UserId::new("u1")).await.unwrap();
        assert_eq!(order.status, OrderStatus::PaymentFailed);

        let remaining = basket.basket(&UserId::new("u1")).await.unwrap();
        assert!(remaining.is_some());
    }
}
