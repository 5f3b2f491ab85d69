//! Types for the search engine

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// A product paired with its relevance score for one scoring pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredProduct<'a> {
    pub product: &'a Product,
    pub score: f64,
}

/// One page of ranked search results plus pager metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Trimmed query the page was computed for
    pub query: String,
    /// Zero-based page index
    pub page: usize,
    pub page_size: usize,
    /// Number of products with a positive score across all pages
    pub total: usize,
    pub total_pages: usize,
    /// Whether a later page holds more results
    pub has_more: bool,
    pub items: Vec<Product>,
}

impl SearchPage {
    /// Empty page returned for blank queries
    pub fn empty(query: impl Into<String>, page: usize, page_size: usize) -> Self {
        Self {
            query: query.into(),
            page,
            page_size,
            total: 0,
            total_pages: 0,
            has_more: false,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
