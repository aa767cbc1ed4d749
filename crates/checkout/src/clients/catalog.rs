//! In-memory catalog store fake.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::ProductId;
use domain::CatalogEntry;

use crate::clients::CatalogClient;
use crate::error::ClientError;

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, CatalogEntry>,
    fail: bool,
}

/// In-memory catalog store for testing and local wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail every call, simulating an
    /// unreachable catalog service.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Inserts or replaces a catalog entry.
    pub fn insert(&self, entry: CatalogEntry) {
        self.state
            .write()
            .unwrap()
            .products
            .insert(entry.product_id, entry);
    }

    /// Returns the number of products carried.
    pub fn product_count(&self) -> usize {
        self.state.read().unwrap().products.len()
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalogStore {
    async fn product(&self, product_id: ProductId) -> Result<Option<CatalogEntry>, ClientError> {
        let state = self.state.read().unwrap();
        if state.fail {
            return Err(ClientError::new("catalog store unreachable"));
        }
        Ok(state.products.get(&product_id).cloned())
    }

    async fn all_products(&self) -> Result<Vec<CatalogEntry>, ClientError> {
        let state = self.state.read().unwrap();
        if state.fail {
            return Err(ClientError::new("catalog store unreachable"));
        }
        let mut products: Vec<_> = state.products.values().cloned().collect();
        products.sort_by_key(|p| p.product_id);
        Ok(products)
    }
}
