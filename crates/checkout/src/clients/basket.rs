//! In-memory basket store fake.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::UserId;
use domain::{Basket, BasketLine};

use crate::clients::BasketClient;
use crate::error::ClientError;

#[derive(Debug, Default)]
struct InMemoryBasketState {
    baskets: HashMap<UserId, Vec<BasketLine>>,
    fail: bool,
}

/// In-memory basket store for testing and local wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBasketStore {
    state: Arc<RwLock<InMemoryBasketState>>,
}

impl InMemoryBasketStore {
    /// Creates a new empty basket store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail every call, simulating an
    /// unreachable basket service.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Replaces a user's basket lines wholesale.
    pub fn set_lines(&self, user_id: impl Into<UserId>, lines: Vec<BasketLine>) {
        self.state
            .write()
            .unwrap()
            .baskets
            .insert(user_id.into(), lines);
    }
}

#[async_trait]
impl BasketClient for InMemoryBasketStore {
    async fn basket(&self, user_id: &UserId) -> Result<Option<Basket>, ClientError> {
        let state = self.state.read().unwrap();
        if state.fail {
            return Err(ClientError::new("basket store unreachable"));
        }
        Ok(state
            .baskets
            .get(user_id)
            .map(|lines| Basket::new(user_id.clone(), lines.clone())))
    }

    async fn upsert_line(&self, user_id: &UserId, line: BasketLine) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();
        if state.fail {
            return Err(ClientError::new("basket store unreachable"));
        }
        state
            .baskets
            .entry(user_id.clone())
            .or_default()
            .push(line);
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();
        if state.fail {
            return Err(ClientError::new("basket store unreachable"));
        }
        state.baskets.remove(user_id);
        Ok(())
    }
}
