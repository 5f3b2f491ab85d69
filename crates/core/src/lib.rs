pub mod cart;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;
pub mod search;

pub use cart::{Cart, CartError};
pub use domain::cart::CartItem;
pub use domain::catalog::CatalogSnapshot;
pub use domain::offer::UpsellOffer;
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommend::{AdjacencyTable, RecommendationEngine};
pub use search::{SearchEngine, SearchPage};
