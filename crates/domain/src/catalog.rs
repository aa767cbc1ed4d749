//! Catalog entries as read from the catalog store.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// Current name, price and stock for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product_id: ProductId,
    pub name: String,

    /// Current unit price, non-negative.
    pub unit_price: Money,

    /// Units in stock.
    pub stock: u32,
}

impl CatalogEntry {
    /// Creates a catalog entry.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        stock: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_entry_serialization_roundtrip() {
        let entry = CatalogEntry::new(1u64, "Widget", Money::from_cents(999), 10);
        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: CatalogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
