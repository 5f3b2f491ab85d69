//! Category-driven upsell recommendations.
//!
//! Suggests complementary products for a viewed product or for a whole cart
//! by looking up the anchor categories in a static adjacency table and picking
//! the most discounted candidates from the adjacent categories.

mod adjacency;
mod engine;

pub use adjacency::AdjacencyTable;
pub use engine::RecommendationEngine;

/// Maximum offers returned per recommendation call
pub const DEFAULT_MAX_OFFERS: usize = 4;
