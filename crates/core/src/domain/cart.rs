use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// One cart line. Only `id`, `category` and `quantity` matter to the
/// recommendation engine; `name` and `price` are carried for display and
/// subtotal computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    pub fn new(id: impl Into<ProductId>, category: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            quantity,
            name: String::new(),
            price: Decimal::ZERO,
        }
    }

    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            category: product.category.clone(),
            quantity,
            name: product.name.clone(),
            price: product.price,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
