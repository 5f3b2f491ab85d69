//! Client-side product search.
//!
//! Ranks an in-memory catalog snapshot against a free-text query with a
//! weighted fuzzy field score, then slices the ranking into fixed-size pages.
//! Cost is O(products x query words x field words) per call, which is fine for
//! a catalog of a few hundred products held in memory. There is no inverted
//! index.

mod engine;
mod scoring;
mod types;

pub use engine::{paginate, SearchEngine};
pub use scoring::{fuzzy_field_score, FieldWeights, ScoreCalculator};
pub use types::*;

/// Field score when the whole query occurs verbatim in the field
pub const SUBSTRING_SCORE: f64 = 100.0;

/// Score added for each word pair where one word contains the other
pub const WORD_CONTAINMENT_SCORE: f64 = 50.0;

/// Multiplier applied to the character overlap ratio of a word pair
pub const CHAR_OVERLAP_SCALE: f64 = 20.0;

/// Default number of products per result page
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Default field weights
pub const DEFAULT_WEIGHTS: FieldWeights =
    FieldWeights { name: 3.0, category: 2.0, description: 1.0, brand: 2.0, condition: 1.0 };
