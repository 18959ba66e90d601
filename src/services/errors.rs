use thiserror::Error;

use crate::forms::products::FormErrors;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The submitted category name does not resolve to a category.
    #[error("category not found: {0:?}")]
    CategoryNotFound(String),
    /// Field-level validation failed; the form should be shown again.
    #[error("validation failed: {0}")]
    Validation(FormErrors),
    /// Submitted data could not be converted into domain values.
    #[error("{0}")]
    Form(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
