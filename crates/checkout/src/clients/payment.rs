//! In-memory payment authorizer fake.
//!
//! Defaults to approving every charge, like the original stub
//! authorizer; tests flip it to decline or drop requests.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderId};
use domain::{PaymentOutcome, PaymentStatus};

use crate::clients::PaymentClient;
use crate::error::ClientError;

/// How the fake authorizer answers the next charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizerMode {
    /// Approve every charge.
    #[default]
    Approve,

    /// Decline every charge (a normal authorizer answer).
    Decline,

    /// Answer with an internal error status.
    Error,

    /// Fail at the transport level, as if unreachable.
    Unreachable,
}

#[derive(Debug, Default)]
struct AuthorizerState {
    mode: AuthorizerMode,
    charges: Vec<(OrderId, Money)>,
}

/// In-memory payment authorizer for testing and local wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentAuthorizer {
    state: Arc<RwLock<AuthorizerState>>,
}

impl InMemoryPaymentAuthorizer {
    /// Creates a new authorizer that approves everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how the authorizer answers subsequent charges.
    pub fn set_mode(&self, mode: AuthorizerMode) {
        self.state.write().unwrap().mode = mode;
    }

    /// Returns the number of charge attempts that reached the
    /// authorizer (transport failures do not count).
    pub fn charge_count(&self) -> usize {
        self.state.read().unwrap().charges.len()
    }

    /// Returns the amount of the most recent charge attempt.
    pub fn last_amount(&self) -> Option<Money> {
        self.state
            .read()
            .unwrap()
            .charges
            .last()
            .map(|(_, amount)| *amount)
    }
}

#[async_trait]
impl PaymentClient for InMemoryPaymentAuthorizer {
    async fn authorize(
        &self,
        order_id: OrderId,
        amount: Money,
    ) -> Result<PaymentOutcome, ClientError> {
        let mut state = self.state.write().unwrap();

        let mode = state.mode;
        if mode == AuthorizerMode::Unreachable {
            return Err(ClientError::new("payment authorizer unreachable"));
        }

        state.charges.push((order_id, amount));

        let outcome = match mode {
            AuthorizerMode::Approve => {
                PaymentOutcome::new(order_id, PaymentStatus::Paid, "Payment successful")
            }
            AuthorizerMode::Decline => {
                PaymentOutcome::new(order_id, PaymentStatus::Declined, "Insufficient funds")
            }
            AuthorizerMode::Error => {
                PaymentOutcome::new(order_id, PaymentStatus::Error, "Internal authorizer error")
            }
            AuthorizerMode::Unreachable => unreachable!(),
        };
        Ok(outcome)
    }
}
