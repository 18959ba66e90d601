use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, ImageId, ImageUrl, ProductDescription, ProductId, ProductName,
    ProductPrice, ProductSku,
};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub sku: ProductSku,
    pub price: ProductPrice,
    pub description: Option<ProductDescription>,
    pub category_id: CategoryId,
    pub featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Image attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: ImageUrl,
}

/// Information required to create a new [`Product`] together with its images.
///
/// New products are never featured.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewProduct {
    pub name: ProductName,
    pub sku: ProductSku,
    pub price: ProductPrice,
    pub description: Option<ProductDescription>,
    pub category_id: CategoryId,
    pub images: Vec<ImageUrl>,
}

/// Replacement values for an existing [`Product`].
///
/// `category` is left unchanged when `None`. `images` is the complete new
/// image set; the store reconciles it against the persisted one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ProductUpdate {
    pub name: ProductName,
    pub sku: ProductSku,
    pub price: ProductPrice,
    pub description: Option<ProductDescription>,
    pub category_id: Option<CategoryId>,
    pub images: Vec<ImageUrl>,
}

