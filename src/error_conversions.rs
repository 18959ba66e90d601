//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::forms::products::ProductFormError;
    use crate::services::ServiceError;

    impl From<ProductFormError> for ServiceError {
        fn from(val: ProductFormError) -> Self {
            match val {
                ProductFormError::Invalid(errors) => ServiceError::Validation(errors),
                ProductFormError::TypeConstraint(message) => ServiceError::Form(message),
            }
        }
    }
}
