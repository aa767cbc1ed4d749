//! Checkout orchestration for the order service.
//!
//! This crate owns the one workflow with real design stakes: turning a
//! user's basket into a priced, paid-or-failed order across three
//! remote dependencies with no shared transaction.
//!
//! The checkout workflow runs these steps in order:
//! 1. Fetch the basket
//! 2. Resolve every line against the catalog (all-or-nothing)
//! 3. Pin prices and persist the order as `Created` (the commit point)
//! 4. Request payment authorization
//! 5. Settle the order to `Paid` or `PaymentFailed`
//!
//! A failed payment is a terminal, queryable outcome, never a rollback.

pub mod clients;
pub mod error;
pub mod orchestrator;
pub mod query;

pub use clients::{
    AuthorizerMode, BasketClient, CatalogClient, HttpBasketClient, HttpCatalogClient,
    HttpPaymentClient, InMemoryBasketStore, InMemoryCatalogStore, InMemoryPaymentAuthorizer,
    PaymentClient,
};
pub use error::{CheckoutError, ClientError, Upstream};
pub use orchestrator::{CheckoutOptions, CheckoutOrchestrator};
pub use query::OrderQueries;
