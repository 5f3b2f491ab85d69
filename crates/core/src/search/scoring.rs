//! Fuzzy scoring of product fields against a query

use crate::domain::product::Product;

use super::{CHAR_OVERLAP_SCALE, SUBSTRING_SCORE, WORD_CONTAINMENT_SCORE};

/// Per-field multipliers applied to fuzzy field scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    /// Weight for the product name (default: 3)
    pub name: f64,
    /// Weight for the category (default: 2)
    pub category: f64,
    /// Weight for the description (default: 1)
    pub description: f64,
    /// Weight for the brand (default: 2)
    pub brand: f64,
    /// Weight for the condition (default: 1)
    pub condition: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Scores one field of text against a query.
///
/// A field containing the whole query scores exactly [`SUBSTRING_SCORE`].
/// Otherwise every `(query word, field word)` pair contributes, and the
/// contributions are summed rather than maxed, so long queries against long
/// fields accumulate large scores. Words are split on single spaces. An empty
/// or whitespace-only field scores zero.
pub fn fuzzy_field_score(text: &str, query: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let text = text.to_lowercase();
    let query = query.to_lowercase();
    if text.contains(&query) {
        return SUBSTRING_SCORE;
    }

    let text_words: Vec<&str> = text.split(' ').collect();
    let mut score = 0.0;

    for query_word in query.split(' ') {
        for text_word in &text_words {
            if text_word.contains(query_word) || query_word.contains(text_word) {
                score += WORD_CONTAINMENT_SCORE;
            } else {
                score += char_overlap_score(query_word, text_word);
            }
        }
    }

    score
}

/// Share of query word characters that appear anywhere in the field word,
/// scaled to [`CHAR_OVERLAP_SCALE`]. Repeated characters each count.
fn char_overlap_score(query_word: &str, text_word: &str) -> f64 {
    let length = query_word.chars().count();
    if length == 0 {
        return 0.0;
    }

    let matched = query_word.chars().filter(|ch| text_word.contains(*ch)).count();
    matched as f64 / length as f64 * CHAR_OVERLAP_SCALE
}

/// Weighted product scorer
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: FieldWeights,
}

impl ScoreCalculator {
    /// Create a calculator with default weights
    pub fn new() -> Self {
        Self { weights: FieldWeights::default() }
    }

    /// Create with custom weights
    pub fn with_weights(weights: FieldWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> FieldWeights {
        self.weights
    }

    /// Weighted sum of the fuzzy scores of every searchable field
    pub fn product_score(&self, product: &Product, query: &str) -> f64 {
        fuzzy_field_score(&product.name, query) * self.weights.name
            + fuzzy_field_score(&product.category, query) * self.weights.category
            + fuzzy_field_score(&product.description, query) * self.weights.description
            + fuzzy_field_score(&product.brand, query) * self.weights.brand
            + fuzzy_field_score(&product.condition, query) * self.weights.condition
    }
}
