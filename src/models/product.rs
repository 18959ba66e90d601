use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{
    ProductDescription, ProductName, ProductPrice, ProductSku, TypeConstraintError,
};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub description: Option<String>,
    pub category_id: i32,
    pub featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`]. `featured` and timestamps use column defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub description: Option<String>,
    pub category_id: i32,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: ProductName::new(product.name)?,
            sku: ProductSku::new(product.sku)?,
            price: ProductPrice::new(product.price)?,
            description: product
                .description
                .filter(|d| !d.is_empty())
                .map(ProductDescription::new)
                .transpose()?,
            category_id: product.category_id.try_into()?,
            featured: product.featured,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl From<&DomainNewProduct> for NewProduct {
    fn from(product: &DomainNewProduct) -> Self {
        Self {
            name: product.name.as_str().to_string(),
            sku: product.sku.as_str().to_string(),
            price: product.price.get(),
            description: product
                .description
                .as_ref()
                .map(|d| d.as_str().to_string()),
            category_id: product.category_id.get(),
        }
    }
}
