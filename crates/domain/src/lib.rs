//! Domain layer for the checkout system.
//!
//! This crate provides the data model shared by the orchestrator, the
//! order ledger and the HTTP surface:
//! - Baskets and basket lines (owned by the basket store)
//! - Catalog entries (owned by the catalog store)
//! - Orders with price-pinned lines and an explicit status machine
//! - Payment outcomes as returned by the payment authorizer

pub mod basket;
pub mod catalog;
pub mod order;
pub mod payment;

pub use basket::{Basket, BasketLine};
pub use catalog::CatalogEntry;
pub use order::{InvalidTransition, Order, OrderLine, OrderStatus};
pub use payment::{PaymentOutcome, PaymentStatus};
