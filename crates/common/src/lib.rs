//! Shared types for the checkout system.

pub mod ids;
pub mod money;

pub use ids::{OrderId, ProductId, UserId};
pub use money::Money;
