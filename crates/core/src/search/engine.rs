//! Search engine implementation

use tracing::debug;

use crate::domain::product::Product;

use super::scoring::{FieldWeights, ScoreCalculator};
use super::types::{ScoredProduct, SearchPage};
use super::DEFAULT_PAGE_SIZE;

/// Ranks and paginates a catalog snapshot against free-text queries.
///
/// Holds no state between calls; concurrent or superseded invocations are
/// independent of each other.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    calculator: ScoreCalculator,
    page_size: usize,
}

impl SearchEngine {
    /// Create an engine with default weights and page size
    pub fn new() -> Self {
        Self { calculator: ScoreCalculator::new(), page_size: DEFAULT_PAGE_SIZE }
    }

    /// Set the page size. A zero page size is bumped to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set custom field weights
    pub fn with_weights(mut self, weights: FieldWeights) -> Self {
        self.calculator = ScoreCalculator::with_weights(weights);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Relevance score of a single product for an already-trimmed query
    pub fn score(&self, product: &Product, query: &str) -> f64 {
        self.calculator.product_score(product, query)
    }

    /// Scores every product, drops non-positive scores and sorts the rest by
    /// descending score. Ties keep catalog order.
    pub fn rank<'a>(&self, query: &str, catalog: &'a [Product]) -> Vec<ScoredProduct<'a>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredProduct<'a>> = catalog
            .iter()
            .map(|product| ScoredProduct { product, score: self.score(product, &query) })
            .filter(|candidate| candidate.score > 0.0)
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Ranks the catalog and returns the zero-based `page` of results
    pub fn search(&self, query: &str, catalog: &[Product], page: usize) -> SearchPage {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SearchPage::empty(trimmed, page, self.page_size);
        }

        let ranked = self.rank(trimmed, catalog);
        let total = ranked.len();
        let items: Vec<Product> = paginate(&ranked, page, self.page_size)
            .iter()
            .map(|candidate| candidate.product.clone())
            .collect();

        debug!(
            event_name = "search.ranked",
            query_words = trimmed.split(' ').count(),
            catalog_size = catalog.len(),
            total,
            page,
            "search results ranked"
        );

        SearchPage {
            query: trimmed.to_string(),
            page,
            page_size: self.page_size,
            total,
            total_pages: total.div_ceil(self.page_size),
            has_more: page.saturating_add(1).saturating_mul(self.page_size) < total,
            items,
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Slice `[page * page_size, page * page_size + page_size)` of `items`,
/// clamped to the available range.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
