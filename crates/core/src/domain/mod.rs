pub mod cart;
pub mod catalog;
pub mod offer;
pub mod product;
