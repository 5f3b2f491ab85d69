use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// Product projection shaped for upsell display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsellOffer {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    pub image: String,
    pub is_promo: bool,
    pub category: String,
    pub stock: u32,
}

impl From<&Product> for UpsellOffer {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            uuid: product.uuid.clone(),
            name: product.name.clone(),
            price: product.price,
            old_price: product.old_price,
            discount: product.discount,
            image: product.image.clone(),
            is_promo: product.is_promo,
            category: product.category.clone(),
            stock: product.stock,
        }
    }
}
