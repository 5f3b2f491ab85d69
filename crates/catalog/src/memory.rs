use async_trait::async_trait;
use rust_decimal::Decimal;
use shopfront_core::{CatalogSnapshot, Product};

use crate::{CatalogError, CatalogProvider};

/// Serves a fixed product list.
pub struct InMemoryCatalogProvider {
    label: String,
    products: Vec<Product>,
}

impl InMemoryCatalogProvider {
    pub fn new(label: impl Into<String>, products: Vec<Product>) -> Self {
        Self { label: label.into(), products }
    }

    /// Small deterministic storefront catalog for smoke runs and demos.
    pub fn demo() -> Self {
        Self::new("demo", demo_products())
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalogProvider {
    fn source(&self) -> String {
        format!("memory:{}", self.label)
    }

    async fn fetch(&self) -> Result<CatalogSnapshot, CatalogError> {
        Ok(CatalogSnapshot::new(self.products.clone(), self.source()))
    }
}

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: u64,
    name: &'static str,
    category: &'static str,
    brand: &'static str,
    description: &'static str,
    price_cents: i64,
    discount: i64,
    is_promo: bool,
    stock: u32,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: 1,
        name: "RTX 4070",
        category: "Composants",
        brand: "Nvidia",
        description: "Carte graphique 12 Go GDDR6X",
        price_cents: 62_900,
        discount: 24,
        is_promo: true,
        stock: 8,
    },
    ProductSeed {
        id: 2,
        name: "RTX 4090",
        category: "Composants",
        brand: "Nvidia",
        description: "Carte graphique 24 Go GDDR6X",
        price_cents: 189_900,
        discount: 18,
        is_promo: true,
        stock: 3,
    },
    ProductSeed {
        id: 3,
        name: "Chaise Gamer",
        category: "Accessoires",
        brand: "Corsair",
        description: "Chaise ergonomique avec accoudoirs 4D",
        price_cents: 29_900,
        discount: 0,
        is_promo: false,
        stock: 12,
    },
    ProductSeed {
        id: 4,
        name: "Ryzen 7 7800X3D",
        category: "Processeurs",
        brand: "AMD",
        description: "Processeur 8 coeurs AM5",
        price_cents: 44_900,
        discount: 12,
        is_promo: true,
        stock: 6,
    },
    ProductSeed {
        id: 5,
        name: "DDR5 32 Go 6000 MHz",
        category: "RAM",
        brand: "Kingston",
        description: "Kit mémoire 2 x 16 Go",
        price_cents: 12_990,
        discount: 15,
        is_promo: true,
        stock: 20,
    },
    ProductSeed {
        id: 6,
        name: "SSD NVMe 2 To",
        category: "Stockage",
        brand: "Samsung",
        description: "SSD PCIe 4.0 990 Pro",
        price_cents: 17_990,
        discount: 0,
        is_promo: false,
        stock: 15,
    },
    ProductSeed {
        id: 7,
        name: "Souris sans fil",
        category: "Périphériques",
        brand: "Logitech",
        description: "Souris gamer 25K DPI",
        price_cents: 8_990,
        discount: 30,
        is_promo: true,
        stock: 40,
    },
    ProductSeed {
        id: 8,
        name: "Écran 27 pouces QHD",
        category: "Écrans",
        brand: "Asus",
        description: "Moniteur IPS 165 Hz",
        price_cents: 32_900,
        discount: 10,
        is_promo: false,
        stock: 5,
    },
];

fn demo_products() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| {
            let mut product = Product::new(seed.id, seed.name)
                .with_category(seed.category)
                .with_brand(seed.brand)
                .with_description(seed.description)
                .with_price(Decimal::new(seed.price_cents, 2))
                .with_promo(seed.is_promo);
            if seed.discount > 0 {
                product = product.with_discount(Decimal::from(seed.discount));
            }
            product.stock = seed.stock;
            product
        })
        .collect()
}
