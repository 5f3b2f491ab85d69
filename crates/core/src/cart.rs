//! Shopping cart bookkeeping.
//!
//! The cart is the explicit input of cart-aggregate recommendations. It is
//! persisted as a JSON array of [`CartItem`] so a session can be resumed,
//! mirroring a browser-storage cart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::cart::CartItem;
use crate::domain::product::{Product, ProductId};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("could not read cart file `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write cart file `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not decode cart file `{path}`: {source}")]
    Decode { path: PathBuf, source: serde_json::Error },
    #[error("could not encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Lines are unique by normalized product id, including after
/// deserialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::new(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        let mut cart = Self::default();
        for item in items {
            cart.add_item(item);
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        self.add_item(CartItem::from_product(product, quantity));
    }

    fn add_item(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// Sets the quantity of an existing line. Zero removes the line. Returns
    /// false when the product is not in the cart.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(id);
        }
        match self.items.iter_mut().find(|line| &line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units across every line
    pub fn item_count(&self) -> u32 {
        self.items.iter().fold(0_u32, |total, item| total.saturating_add(item.quantity))
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Loads a cart file. A missing file is an empty cart.
    pub fn load(path: &Path) -> Result<Self, CartError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(event_name = "cart.load.missing", path = %path.display(), "no cart file");
                return Ok(Self::default());
            }
            Err(source) => return Err(CartError::Read { path: path.to_path_buf(), source }),
        };

        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&raw)
            .map_err(|source| CartError::Decode { path: path.to_path_buf(), source })
    }

    pub fn save(&self, path: &Path) -> Result<(), CartError> {
        let encoded = serde_json::to_string_pretty(&self.items)?;
        fs::write(path, encoded)
            .map_err(|source| CartError::Write { path: path.to_path_buf(), source })?;
        debug!(
            event_name = "cart.saved",
            path = %path.display(),
            lines = self.items.len(),
            "cart persisted"
        );
        Ok(())
    }
}
