use serde::Serialize;

use crate::domain::product::Product;

/// Product row as shown in listings and confirmation pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub sku: String,
    /// Price formatted with two decimals.
    pub price: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub featured: bool,
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            sku: value.sku.into_inner(),
            price: value.price.to_string(),
            description: value.description.map(|d| d.into_inner()),
            category_id: value.category_id.get(),
            featured: value.featured,
        }
    }
}
