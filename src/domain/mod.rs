//! Domain entities and value objects for the product catalog.

pub mod category;
pub mod images;
pub mod product;
pub mod types;
