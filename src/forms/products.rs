//! Product create/edit form handling.
//!
//! All submitted fields arrive as strings. Validation runs in two passes:
//! a presence pass over the required fields, and a format pass that is only
//! reached when every required field is present. The resulting
//! [`FormErrors`] map is rendered back into the form.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::product::{NewProduct, Product, ProductImage, ProductUpdate};
use crate::domain::types::{
    CategoryId, CategoryName, ImageUrl, PRODUCT_PRICE_MAX, ProductDescription, ProductName,
    ProductPrice, ProductSku, TypeConstraintError,
};

pub const REQUIRED_FIELDS: [&str; 3] = ["name", "sku", "price"];

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NAME_MESSAGE: &str = "Name can't be longer than 100 characters.";
pub const SKU_MESSAGE: &str = "SKU must contain 8 alphanumeric characters.";
pub const PRICE_MESSAGE: &str = "Price can't be negative or greater than $9999.9";

/// Number of image slots offered by the product forms.
pub const IMAGE_SLOTS: usize = 3;

/// Field name to message mapping rendered next to form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Single error under `field`.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert(field, message);
        errors
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = Self::default();
        for (field, field_errors) in value.field_errors() {
            if let Some(error) = field_errors.first() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                errors.insert(field.to_string(), message);
            }
        }
        errors
    }
}

/// Plain decimal notation with at most two fractional digits.
fn is_price_literal(price: &str) -> bool {
    let (whole, fraction) = price.split_once('.').unwrap_or((price, ""));
    let whole = whole.strip_prefix(['+', '-']).unwrap_or(whole);
    (!whole.is_empty() || !fraction.is_empty())
        && fraction.len() <= 2
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

fn validate_price(price: &str) -> Result<(), ValidationError> {
    let price = price.trim();
    match price.parse::<f64>() {
        Ok(value)
            if is_price_literal(price)
                && value.is_finite()
                && (0.0..=PRODUCT_PRICE_MAX).contains(&value) =>
        {
            Ok(())
        }
        _ => Err(ValidationError::new("price").with_message(Cow::Borrowed(PRICE_MESSAGE))),
    }
}

/// Raw product form as submitted by the browser.
///
/// Image slots are named `image_1..3`; the hyphenated `image-1..3` spelling
/// is accepted as well. When a body carries both spellings of a slot the
/// non-empty underscore value wins.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(from = "SubmittedProductForm")]
pub struct ProductForm {
    #[validate(length(max = 100, message = "Name can't be longer than 100 characters."))]
    pub name: String,
    #[validate(length(equal = 8, message = "SKU must contain 8 alphanumeric characters."))]
    pub sku: String,
    #[validate(custom(function = "validate_price"))]
    pub price: String,
    pub description: String,
    pub category: String,
    pub image_1: String,
    pub image_2: String,
    pub image_3: String,
}

/// Wire shape of [`ProductForm`] with both image slot spellings kept apart.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubmittedProductForm {
    name: String,
    sku: String,
    price: String,
    description: String,
    category: String,
    image_1: String,
    image_2: String,
    image_3: String,
    #[serde(rename = "image-1")]
    legacy_image_1: String,
    #[serde(rename = "image-2")]
    legacy_image_2: String,
    #[serde(rename = "image-3")]
    legacy_image_3: String,
}

fn image_slot(primary: String, legacy: String) -> String {
    if primary.is_empty() { legacy } else { primary }
}

impl From<SubmittedProductForm> for ProductForm {
    fn from(value: SubmittedProductForm) -> Self {
        Self {
            name: value.name,
            sku: value.sku,
            price: value.price,
            description: value.description,
            category: value.category,
            image_1: image_slot(value.image_1, value.legacy_image_1),
            image_2: image_slot(value.image_2, value.legacy_image_2),
            image_3: image_slot(value.image_3, value.legacy_image_3),
        }
    }
}

impl ProductForm {
    /// Pre-populate the form from a stored product.
    pub fn from_product(product: &Product, images: &[ProductImage], category: &str) -> Self {
        let mut slots = images.iter().map(|i| i.url.as_str().to_string());
        Self {
            name: product.name.as_str().to_string(),
            sku: product.sku.as_str().to_string(),
            price: format!("{:.2}", product.price.get()),
            description: product
                .description
                .as_ref()
                .map(|d| d.as_str().to_string())
                .unwrap_or_default(),
            category: category.to_string(),
            image_1: slots.next().unwrap_or_default(),
            image_2: slots.next().unwrap_or_default(),
            image_3: slots.next().unwrap_or_default(),
        }
    }

    fn required_values(&self) -> [(&'static str, &str); 3] {
        [
            (REQUIRED_FIELDS[0], self.name.as_str()),
            (REQUIRED_FIELDS[1], self.sku.as_str()),
            (REQUIRED_FIELDS[2], self.price.as_str()),
        ]
    }

    /// Run the presence pass and, when it passes, the format pass.
    ///
    /// Format checks never run on missing values, so a payload without a
    /// price cannot produce a price parse error.
    pub fn validate_fields(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        for (field, value) in self.required_values() {
            if value.is_empty() {
                errors.insert(field, REQUIRED_MESSAGE);
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        self.validate().map_err(FormErrors::from)
    }

    /// Non-empty image slots in slot order, duplicates removed.
    pub fn image_urls(&self) -> Result<Vec<ImageUrl>, TypeConstraintError> {
        let mut urls: Vec<ImageUrl> = Vec::with_capacity(IMAGE_SLOTS);
        for slot in [&self.image_1, &self.image_2, &self.image_3] {
            if slot.is_empty() {
                continue;
            }
            let url = ImageUrl::new(slot.as_str())?;
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        Ok(urls)
    }
}

/// Validated, typed product form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ProductName,
    pub sku: ProductSku,
    pub price: ProductPrice,
    pub description: Option<ProductDescription>,
    /// Submitted category name, `None` when the field was left empty.
    pub category: Option<CategoryName>,
    pub images: Vec<ImageUrl>,
}

impl ProductFormPayload {
    pub fn into_new_product(self, category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: self.name,
            sku: self.sku,
            price: self.price,
            description: self.description,
            category_id,
            images: self.images,
        }
    }

    pub fn into_update(self, category_id: Option<CategoryId>) -> ProductUpdate {
        ProductUpdate {
            name: self.name,
            sku: self.sku,
            price: self.price,
            description: self.description,
            category_id,
            images: self.images,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Invalid(FormErrors),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<FormErrors> for ProductFormError {
    fn from(value: FormErrors) -> Self {
        Self::Invalid(value)
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate_fields()?;

        let price = value
            .price
            .trim()
            .parse::<f64>()
            .map_err(|_| FormErrors::single("price", PRICE_MESSAGE))?;
        let images = value.image_urls()?;

        Ok(Self {
            name: ProductName::new(value.name)?,
            sku: ProductSku::new(value.sku)?,
            price: ProductPrice::new(price)?,
            description: Some(value.description)
                .filter(|d| !d.is_empty())
                .map(ProductDescription::new)
                .transpose()?,
            category: Some(value.category)
                .filter(|c| !c.is_empty())
                .map(CategoryName::new)
                .transpose()?,
            images,
        })
    }
}
