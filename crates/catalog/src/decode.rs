//! Catalog payload decoding.
//!
//! The backend has served the product list both as a bare JSON array and
//! wrapped in an envelope (`{"products": [...]}` or `{"data": [...]}`).
//! All three shapes are accepted. Records are decoded one at a time so a
//! single malformed product is skipped instead of failing the catalog.

use serde::Deserialize;
use serde_json::Value;
use shopfront_core::Product;
use tracing::warn;

use crate::CatalogError;

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogPayload {
    Bare(Vec<Value>),
    Products { products: Vec<Value> },
    Data { data: Vec<Value> },
}

pub fn decode_products(raw: &[u8], origin: &str) -> Result<Vec<Product>, CatalogError> {
    let payload: CatalogPayload = serde_json::from_slice(raw).map_err(|error| {
        CatalogError::Decode {
            origin: origin.to_string(),
            message: format!(
                "expected a product array or a `products`/`data` envelope ({error})"
            ),
        }
    })?;

    let records = match payload {
        CatalogPayload::Bare(records)
        | CatalogPayload::Products { products: records }
        | CatalogPayload::Data { data: records } => records,
    };

    let mut products = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Product>(record) {
            Ok(product) => products.push(product),
            Err(error) => warn!(
                event_name = "catalog.decode.record_skipped",
                origin,
                index,
                error = %error,
                "skipping malformed catalog record"
            ),
        }
    }

    Ok(products)
}
