//! Payment authorization outcomes.

use common::OrderId;
use serde::{Deserialize, Serialize};

/// The authorizer's verdict on a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The charge was authorized.
    Paid,

    /// The charge was rejected by the authorizer.
    Declined,

    /// The authorizer hit an internal error processing the charge.
    Error,
}

impl PaymentStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Declined => "Declined",
            PaymentStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the payment authorizer returned for one charge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub message: String,
}

impl PaymentOutcome {
    /// Creates a payment outcome.
    pub fn new(order_id: OrderId, status: PaymentStatus, message: impl Into<String>) -> Self {
        Self {
            order_id,
            status,
            message: message.into(),
        }
    }

    /// Returns true if the charge went through.
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}
