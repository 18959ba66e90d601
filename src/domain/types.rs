//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and numeric constraints are enforced at the
//! boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Maximum number of characters allowed in a product name.
pub const PRODUCT_NAME_MAX_CHARS: usize = 100;
/// Exact number of characters in a product SKU.
pub const PRODUCT_SKU_CHARS: usize = 8;
/// Highest price accepted for a product.
pub const PRODUCT_PRICE_MAX: f64 = 9999.99;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value was outside of its allowed range or not finite.
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
    /// A string was empty.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A string exceeded its maximum length.
    #[error("{0} is too long")]
    TooLong(&'static str),
    /// A string did not have the exact required length.
    #[error("{0} has invalid length")]
    InvalidLength(&'static str),
}

fn require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let value = value.into();
    if value.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(value)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Shared accessors and conversions for string newtypes. The type must
/// provide its own `new` constructor enforcing its constraints.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_impls!($name);
    };
}

id_newtype!(ProductId, "Unique identifier for a product.", "product_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(ImageId, "Unique identifier for a product image.", "image_id");

non_empty_string_newtype!(
    CategoryName,
    "Category name used as the lookup key.",
    "category"
);
non_empty_string_newtype!(
    ProductDescription,
    "Free-form product description.",
    "description"
);
non_empty_string_newtype!(
    ImageUrl,
    "Image location attached to a product. Matched by exact value.",
    "image url"
);

/// Product display name, at most [`PRODUCT_NAME_MAX_CHARS`] characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductName(String);

impl ProductName {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = require_non_empty(value, "product name")?;
        if value.chars().count() > PRODUCT_NAME_MAX_CHARS {
            return Err(TypeConstraintError::TooLong("product name"));
        }
        Ok(Self(value))
    }
}

string_newtype_impls!(ProductName);

/// Stock keeping unit of exactly [`PRODUCT_SKU_CHARS`] characters.
///
/// Only the length is enforced; the character class is not checked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductSku(String);

impl ProductSku {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.chars().count() != PRODUCT_SKU_CHARS {
            return Err(TypeConstraintError::InvalidLength("product sku"));
        }
        Ok(Self(value))
    }
}

string_newtype_impls!(ProductSku);

/// Product price in `[0, PRODUCT_PRICE_MAX]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct ProductPrice(f64);

impl ProductPrice {
    /// Constructs a finite price inside the accepted range.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && (0.0..=PRODUCT_PRICE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::OutOfRange("price"))
        }
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for ProductPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductPrice> for f64 {
    fn from(value: ProductPrice) -> Self {
        value.0
    }
}

impl PartialEq<f64> for ProductPrice {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_ids() {
        let err = ProductId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("product_id"));
    }

    #[test]
    fn product_name_limits_characters_not_bytes() {
        assert!(ProductName::new("é".repeat(100)).is_ok());
        assert_eq!(
            ProductName::new("a".repeat(101)).unwrap_err(),
            TypeConstraintError::TooLong("product name")
        );
    }

    #[test]
    fn product_sku_checks_length_only() {
        assert!(ProductSku::new("ABCD1234").is_ok());
        assert!(ProductSku::new("ab-_ ?!*").is_ok());
        assert_eq!(
            ProductSku::new("ABC").unwrap_err(),
            TypeConstraintError::InvalidLength("product sku")
        );
    }

    #[test]
    fn product_price_bounds_are_inclusive() {
        assert_eq!(ProductPrice::new(0.0).unwrap().get(), 0.0);
        assert_eq!(ProductPrice::new(9999.99).unwrap().get(), 9999.99);
        assert!(ProductPrice::new(-0.01).is_err());
        assert!(ProductPrice::new(10000.0).is_err());
        assert!(ProductPrice::new(f64::NAN).is_err());
    }

    #[test]
    fn image_url_keeps_value_verbatim() {
        let url = ImageUrl::new("/media/a.png").unwrap();
        assert_eq!(url, "/media/a.png");
        assert!(ImageUrl::new("").is_err());
    }
}
