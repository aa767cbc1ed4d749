use common::OrderId;
use domain::InvalidTransition;
use thiserror::Error;

/// Errors that can occur when interacting with the order ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An order with this id already exists. Must never surface under
    /// correct id generation; the contract rejects it rather than
    /// silently overwrite.
    #[error("Duplicate order id: {0}")]
    DuplicateOrderId(OrderId),

    /// The order was not found in the ledger.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The requested status change is not allowed by the status machine.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    /// A stored status value could not be parsed.
    #[error("Invalid status value in store: {0}")]
    InvalidStatus(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
