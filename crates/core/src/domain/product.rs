use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque product identifier held in normalized string form.
///
/// The backend emits ids as JSON numbers on some endpoints and as strings on
/// others, so `42` and `"42"` must name the same product.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawProductId::deserialize(deserializer)? {
            RawProductId::Text(value) => Self::new(value),
            RawProductId::Unsigned(value) => Self::from(value),
            RawProductId::Signed(value) => Self::from(value),
            RawProductId::Float(value) => Self(value.to_string()),
        })
    }
}

/// Product record as served by the catalog backend.
///
/// The core never mutates a product. Every field except `id` tolerates being
/// absent or `null` and falls back to its empty value. Flags also accept `0`/`1`
/// and `"true"`/`"false"`; stock accepts any number, clamped into `u32`. Legacy camelCase keys
/// (`oldPrice`, `isPromo`, `isTopSeller`) and the French `etat` are accepted
/// as aliases of the snake_case fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, alias = "etat", deserialize_with = "null_as_default")]
    pub condition: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default, alias = "oldPrice", skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Decimal>,
    #[serde(default, alias = "isPromo", deserialize_with = "lenient_flag")]
    pub is_promo: bool,
    #[serde(default, alias = "isTopSeller", deserialize_with = "lenient_flag")]
    pub is_top_seller: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

impl Product {
    /// Minimal product with every optional field empty.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            name: name.into(),
            category: String::new(),
            description: String::new(),
            brand: String::new(),
            condition: String::new(),
            price: Decimal::ZERO,
            old_price: None,
            discount: None,
            is_promo: false,
            is_top_seller: false,
            stock: 0,
            image: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(discount);
        self
    }

    pub fn with_promo(mut self, is_promo: bool) -> Self {
        self.is_promo = is_promo;
        self
    }

    /// Discount percentage, with a missing value ranked as zero.
    pub fn discount_or_zero(&self) -> Decimal {
        self.discount.unwrap_or(Decimal::ZERO)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        None => false,
        Some(RawFlag::Bool(value)) => value,
        Some(RawFlag::Number(value)) => value != 0.0,
        Some(RawFlag::Text(value)) => {
            matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
        }
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let clamp = |value: f64| {
        if value.is_finite() && value > 0.0 {
            value.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    };

    Ok(match Option::<RawCount>::deserialize(deserializer)? {
        None => 0,
        Some(RawCount::Unsigned(value)) => u32::try_from(value).unwrap_or(u32::MAX),
        Some(RawCount::Signed(value)) => u32::try_from(value.max(0)).unwrap_or(u32::MAX),
        Some(RawCount::Float(value)) => clamp(value),
        Some(RawCount::Text(value)) => value.trim().parse::<f64>().map(clamp).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, ProductId};

    #[test]
    fn numeric_and_string_ids_normalize_to_the_same_value() {
        let numeric: ProductId = serde_json::from_str("42").expect("numeric id");
        let text: ProductId = serde_json::from_str("\" 42 \"").expect("string id");

        assert_eq!(numeric, text);
        assert_eq!(numeric.as_str(), "42");
        assert_eq!(ProductId::from(42_u64), text);
    }

    #[test]
    fn legacy_field_aliases_are_accepted() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Chaise Gamer",
                "oldPrice": 199.9,
                "isPromo": true,
                "isTopSeller": true,
                "etat": "Neuf"
            }"#,
        )
        .expect("product with legacy keys");

        assert_eq!(product.id, ProductId::new("7"));
        assert_eq!(product.old_price, Some(Decimal::new(1999, 1)));
        assert!(product.is_promo);
        assert!(product.is_top_seller);
        assert_eq!(product.condition, "Neuf");
    }

    #[test]
    fn missing_and_null_fields_fall_back_to_empty_values() {
        let product: Product =
            serde_json::from_str(r#"{"id": "a1", "name": null, "price": null, "stock": null}"#)
                .expect("sparse product");

        assert_eq!(product.name, "");
        assert_eq!(product.category, "");
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.stock, 0);
        assert_eq!(product.discount_or_zero(), Decimal::ZERO);
        assert!(!product.is_promo);
    }

    #[test]
    fn loosely_typed_flags_and_stock_are_coerced() {
        let product: Product = serde_json::from_str(
            r#"{"id": 3, "isPromo": 1, "is_top_seller": "false", "stock": -1}"#,
        )
        .expect("loosely typed product");
        assert!(product.is_promo);
        assert!(!product.is_top_seller);
        assert_eq!(product.stock, 0);

        let product: Product =
            serde_json::from_str(r#"{"id": 4, "is_promo": 0, "stock": 3.0}"#).expect("float stock");
        assert!(!product.is_promo);
        assert_eq!(product.stock, 3);

        let product: Product =
            serde_json::from_str(r#"{"id": 5, "is_promo": "true", "stock": "12"}"#)
                .expect("text values");
        assert!(product.is_promo);
        assert_eq!(product.stock, 12);
    }
}
