//! Recommendation engine implementation

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::domain::cart::CartItem;
use crate::domain::offer::UpsellOffer;
use crate::domain::product::{Product, ProductId};

use super::adjacency::AdjacencyTable;
use super::DEFAULT_MAX_OFFERS;

/// Picks upsell offers from a catalog snapshot.
///
/// Every method is a pure projection of its arguments: the catalog and the
/// cart are never mutated and results never contain excluded ids. Fewer than
/// `max_offers` results come back when candidates run out; the list is never
/// padded with unrelated products.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    adjacency: AdjacencyTable,
    max_offers: usize,
}

impl RecommendationEngine {
    pub fn new(adjacency: AdjacencyTable) -> Self {
        Self { adjacency, max_offers: DEFAULT_MAX_OFFERS }
    }

    pub fn with_max_offers(mut self, max_offers: usize) -> Self {
        self.max_offers = max_offers;
        self
    }

    pub fn adjacency(&self) -> &AdjacencyTable {
        &self.adjacency
    }

    /// Offers for a single anchor category.
    ///
    /// An absent or blank category, or one without adjacency entries, falls
    /// back to the most discounted promo products. Lookup is exact: no
    /// trimming or case folding.
    pub fn for_product(
        &self,
        category: Option<&str>,
        exclude: &HashSet<ProductId>,
        catalog: &[Product],
    ) -> Vec<UpsellOffer> {
        let suggested = category
            .filter(|category| !category.trim().is_empty())
            .map(|category| self.adjacency.suggestions(category))
            .unwrap_or(&[]);

        if suggested.is_empty() {
            debug!(
                event_name = "recommend.product.fallback",
                category = category.unwrap_or(""),
                "no adjacency for category, using promo fallback"
            );
            return self.top_promos(catalog, exclude);
        }

        let mut candidates: Vec<&Product> = catalog
            .iter()
            .filter(|product| suggested.contains(&product.category))
            .filter(|product| !exclude.contains(&product.id))
            .collect();
        candidates.sort_by_key(|product| Reverse(product.discount_or_zero()));

        debug!(
            event_name = "recommend.product.adjacent",
            category = category.unwrap_or(""),
            candidates = candidates.len(),
            "adjacent candidates selected"
        );
        self.take_offers(candidates)
    }

    /// Offers for the product currently on display, never including itself
    pub fn for_viewed_product(&self, product: &Product, catalog: &[Product]) -> Vec<UpsellOffer> {
        let exclude = HashSet::from([product.id.clone()]);
        self.for_product(Some(&product.category), &exclude, catalog)
    }

    /// Offers for the aggregate contents of a cart.
    ///
    /// Candidates come from the union of the adjacency lists of every distinct
    /// cart category, exclude products already in the cart, and rank promo
    /// products first, then by descending discount.
    pub fn for_cart(&self, cart_items: &[CartItem], catalog: &[Product]) -> Vec<UpsellOffer> {
        if cart_items.is_empty() {
            debug!(event_name = "recommend.cart.empty", "empty cart, using promo fallback");
            return self.top_promos(catalog, &HashSet::new());
        }

        let in_cart: HashSet<ProductId> = cart_items.iter().map(|item| item.id.clone()).collect();
        let categories = self.candidate_categories(cart_items);
        if categories.is_empty() {
            debug!(
                event_name = "recommend.cart.fallback",
                cart_lines = cart_items.len(),
                "no adjacency for cart categories, using promo fallback"
            );
            return self.top_promos(catalog, &in_cart);
        }

        let mut candidates: Vec<&Product> = catalog
            .iter()
            .filter(|product| categories.contains(&product.category))
            .filter(|product| !in_cart.contains(&product.id))
            .collect();
        candidates
            .sort_by_key(|product| (Reverse(product.is_promo), Reverse(product.discount_or_zero())));

        debug!(
            event_name = "recommend.cart.adjacent",
            cart_lines = cart_items.len(),
            categories = categories.len(),
            candidates = candidates.len(),
            "cart candidates selected"
        );
        self.take_offers(candidates)
    }

    /// Union of suggested categories across the distinct categories in a cart
    pub fn candidate_categories(&self, cart_items: &[CartItem]) -> BTreeSet<String> {
        self.adjacency.union_for(cart_items.iter().map(|item| item.category.as_str()))
    }

    fn top_promos(&self, catalog: &[Product], exclude: &HashSet<ProductId>) -> Vec<UpsellOffer> {
        let mut candidates: Vec<&Product> = catalog
            .iter()
            .filter(|product| product.is_promo)
            .filter(|product| !exclude.contains(&product.id))
            .collect();
        candidates.sort_by_key(|product| Reverse(product.discount_or_zero()));
        self.take_offers(candidates)
    }

    fn take_offers(&self, candidates: Vec<&Product>) -> Vec<UpsellOffer> {
        candidates.into_iter().take(self.max_offers).map(UpsellOffer::from).collect()
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(AdjacencyTable::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet, HashSet};

    use rust_decimal::Decimal;

    use super::*;

    fn product(id: u64, category: &str, discount: Option<i64>, is_promo: bool) -> Product {
        let mut product =
            Product::new(id, format!("product {id}")).with_category(category).with_promo(is_promo);
        product.discount = discount.map(Decimal::from);
        product
    }

    fn offer_ids(offers: &[UpsellOffer]) -> Vec<String> {
        offers.iter().map(|offer| offer.id.to_string()).collect()
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Processeurs", Some(10), false),
            product(2, "RAM", Some(30), false),
            product(3, "Stockage", None, true),
            product(4, "Processeurs", Some(25), true),
            product(5, "Écrans", Some(50), true),
            product(6, "Accessoires", Some(5), true),
            product(7, "Cartes mères", Some(15), false),
            product(8, "Téléphones", Some(40), true),
        ]
    }

    #[test]
    fn adjacent_categories_sorted_by_discount() {
        let engine = RecommendationEngine::default();

        let offers = engine.for_product(Some("Composants"), &HashSet::new(), &catalog());

        // Composants -> Processeurs, RAM, Stockage
        assert_eq!(offer_ids(&offers), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn excluded_ids_never_returned_even_across_representations() {
        let engine = RecommendationEngine::default();
        let exclude: HashSet<ProductId> = [ProductId::new(" 2"), ProductId::from(4_u64)].into();

        let offers = engine.for_product(Some("Composants"), &exclude, &catalog());

        assert_eq!(offer_ids(&offers), vec!["1", "3"]);
        assert!(offers.iter().all(|offer| !exclude.contains(&offer.id)));
    }

    #[test]
    fn unknown_category_falls_back_to_top_promos() {
        let engine = RecommendationEngine::default();
        let exclude: HashSet<ProductId> = [ProductId::new("5")].into();

        let offers = engine.for_product(Some("Jeux vidéo"), &exclude, &catalog());

        // promo items by discount: 8 (40), 4 (25), 6 (5), 3 (none)
        assert_eq!(offer_ids(&offers), vec!["8", "4", "6", "3"]);
    }

    #[test]
    fn absent_or_blank_category_falls_back_to_top_promos() {
        let engine = RecommendationEngine::default();
        let none = engine.for_product(None, &HashSet::new(), &catalog());
        let blank = engine.for_product(Some("  "), &HashSet::new(), &catalog());

        assert_eq!(offer_ids(&none), vec!["5", "8", "4", "6"]);
        assert_eq!(none, blank);
    }

    #[test]
    fn category_lookup_is_exact() {
        let engine = RecommendationEngine::default();
        let padded = engine.for_product(Some(" RAM "), &HashSet::new(), &catalog());
        let none = engine.for_product(None, &HashSet::new(), &catalog());

        assert_eq!(padded, none);
    }

    #[test]
    fn viewed_product_is_excluded_from_its_own_offers() {
        let engine = RecommendationEngine::default();
        let viewed = product(4, "RAM", Some(25), true);

        let offers = engine.for_viewed_product(&viewed, &catalog());

        // RAM -> Processeurs, Cartes mères
        assert_eq!(offer_ids(&offers), vec!["7", "1"]);
    }

    #[test]
    fn never_pads_with_unrelated_products() {
        let engine = RecommendationEngine::default();
        let offers = engine.for_product(Some("Téléphones"), &HashSet::new(), &catalog());

        assert_eq!(offer_ids(&offers), vec!["6"]);
    }

    #[test]
    fn empty_cart_gets_top_promos_without_exclusion() {
        let engine = RecommendationEngine::default();
        let offers = engine.for_cart(&[], &catalog());

        assert_eq!(offer_ids(&offers), vec!["5", "8", "4", "6"]);
    }

    #[test]
    fn cart_candidates_are_union_of_adjacency_lists() {
        let table = AdjacencyTable::new(BTreeMap::from([
            ("A".to_string(), vec!["X".to_string(), "Y".to_string()]),
            ("B".to_string(), vec!["Y".to_string(), "Z".to_string()]),
        ]));
        let engine = RecommendationEngine::new(table);
        let cart =
            vec![CartItem::new("1", "A", 1), CartItem::new("2", "B", 2), CartItem::new("3", "A", 1)];

        let expected: BTreeSet<String> = ["X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(engine.candidate_categories(&cart), expected);
    }

    #[test]
    fn cart_offers_rank_promo_before_discount() {
        let engine = RecommendationEngine::default();
        // RAM -> Processeurs, Cartes mères; Stockage -> Composants, Accessoires
        let cart = vec![CartItem::new(2_u64, "RAM", 1), CartItem::new(3_u64, "Stockage", 1)];

        let offers = engine.for_cart(&cart, &catalog());

        // promo: 4 (25), 6 (5); then non-promo: 7 (15), 1 (10)
        assert_eq!(offer_ids(&offers), vec!["4", "6", "7", "1"]);
    }

    #[test]
    fn cart_products_inside_suggested_categories_are_excluded() {
        let engine = RecommendationEngine::default();
        // RAM -> Processeurs, Cartes mères; Processeurs -> Cartes mères, RAM, Refroidissement
        let cart = vec![CartItem::new(2_u64, "RAM", 1), CartItem::new(4_u64, "Processeurs", 1)];

        let offers = engine.for_cart(&cart, &catalog());

        assert_eq!(offer_ids(&offers), vec!["7", "1"]);

        let mixed_ids = vec![CartItem::new(" 2", "RAM", 1), CartItem::new("4", "Processeurs", 1)];
        assert_eq!(engine.for_cart(&mixed_ids, &catalog()), offers);
    }

    #[test]
    fn cart_without_adjacency_falls_back_excluding_cart_ids() {
        let engine = RecommendationEngine::default();
        let cart = vec![CartItem::new("8", "Jeux vidéo", 1)];

        let offers = engine.for_cart(&cart, &catalog());

        assert_eq!(offer_ids(&offers), vec!["5", "4", "6", "3"]);
    }

    #[test]
    fn max_offers_is_respected() {
        let engine = RecommendationEngine::default().with_max_offers(2);
        let offers = engine.for_cart(&[], &catalog());

        assert_eq!(offer_ids(&offers), vec!["5", "8"]);
    }
}
