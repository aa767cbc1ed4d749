//! Client traits for the three remote dependencies, with in-memory
//! fakes and HTTP adapters.
//!
//! Each call has three outcomes: a value, a normal absence
//! (`Ok(None)`), or a transport failure ([`ClientError`]). The
//! orchestrator turns absence into business decisions and failure into
//! operational ones; clients themselves carry no retry or
//! circuit-breaking logic.

pub mod basket;
pub mod catalog;
pub mod http;
pub mod payment;

use async_trait::async_trait;
use common::{Money, OrderId, ProductId, UserId};
use domain::{Basket, BasketLine, CatalogEntry, PaymentOutcome};

use crate::error::ClientError;

pub use basket::InMemoryBasketStore;
pub use catalog::InMemoryCatalogStore;
pub use http::{HttpBasketClient, HttpCatalogClient, HttpPaymentClient};
pub use payment::{AuthorizerMode, InMemoryPaymentAuthorizer};

/// Access to the basket store boundary.
#[async_trait]
pub trait BasketClient: Send + Sync {
    /// Fetches a user's basket, `None` if the store has never seen the
    /// user.
    async fn basket(&self, user_id: &UserId) -> Result<Option<Basket>, ClientError>;

    /// Adds a line to a user's basket, creating the basket if needed.
    async fn upsert_line(&self, user_id: &UserId, line: BasketLine) -> Result<(), ClientError>;

    /// Empties a user's basket.
    ///
    /// The orchestrator only calls this when explicitly opted in; see
    /// [`crate::CheckoutOptions::clear_basket_after_payment`].
    async fn clear(&self, user_id: &UserId) -> Result<(), ClientError>;
}

/// Access to the catalog store boundary.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Looks up a product by id, `None` if the catalog does not carry it.
    async fn product(&self, product_id: ProductId) -> Result<Option<CatalogEntry>, ClientError>;

    /// Lists every product the catalog carries.
    async fn all_products(&self) -> Result<Vec<CatalogEntry>, ClientError>;
}

/// Access to the payment authorizer boundary.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Requests authorization for a charge, synchronously.
    async fn authorize(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentOutcome, ClientError>;
}
