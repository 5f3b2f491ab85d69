use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// Fully materialized product list as fetched from a catalog provider.
///
/// The snapshot may be stale; nothing here refreshes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
    pub fetched_at: DateTime<Utc>,
    pub source: String,
}

impl CatalogSnapshot {
    pub fn new(products: Vec<Product>, source: impl Into<String>) -> Self {
        Self { products, fetched_at: Utc::now(), source: source.into() }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }
}
