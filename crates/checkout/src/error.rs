//! Checkout error taxonomy.
//!
//! Business errors (`EmptyBasket`, `ProductNotFound`) mean the workflow
//! stopped with zero side effects. Operational errors (`Upstream`)
//! before the ledger write also leave no state behind; after the write
//! they are not errors at all, the order settles to `PaymentFailed` and
//! is returned to the caller.

use common::{ProductId, UserId};
use ledger::LedgerError;
use thiserror::Error;

/// The remote dependency a client call failed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Basket,
    Catalog,
    Payment,
}

impl Upstream {
    /// Returns the dependency name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Basket => "basket",
            Upstream::Catalog => "catalog",
            Upstream::Payment => "payment",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transport-level failure of a client call.
///
/// Absence of a basket or product is not an error; clients report that
/// as `Ok(None)`. This type covers the exceptional outcomes only:
/// network failures, timeouts, non-success HTTP statuses.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ClientError(pub String);

impl ClientError {
    /// Creates a client error from any displayable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Errors that can abort a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The user's basket is absent or has no lines. No order is created.
    #[error("Basket for user '{0}' is absent or empty")]
    EmptyBasket(UserId),

    /// A basket line references a product the catalog does not know.
    /// No partial order is persisted.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A remote dependency was unreachable or timed out.
    #[error("Upstream {which} unavailable: {reason}")]
    Upstream { which: Upstream, reason: String },

    /// The order ledger failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl CheckoutError {
    /// Wraps a client failure with the dependency it came from.
    pub fn upstream(which: Upstream, err: ClientError) -> Self {
        CheckoutError::Upstream {
            which,
            reason: err.0,
        }
    }
}

/// Result type for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
