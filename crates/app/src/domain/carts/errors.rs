//! Cart service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("quantity cannot be negative")]
    NegativeQuantity,

    #[error("quantity is too large")]
    QuantityTooLarge,

    #[error("Variant not found or not available")]
    VariantNotFound,

    #[error("Product ID does not match variant's product")]
    ProductMismatch,

    #[error("Product not available")]
    ProductUnavailable,

    #[error("cart not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl CartsServiceError {
    /// Whether the caller supplied invalid input, as opposed to referencing
    /// something that does not exist.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NegativeQuantity | Self::QuantityTooLarge | Self::ProductMismatch
        )
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation) => Self::NegativeQuantity,
            Some(ErrorKind::ForeignKeyViolation) => Self::VariantNotFound,
            Some(
                ErrorKind::UniqueViolation | ErrorKind::NotNullViolation | ErrorKind::Other | _,
            )
            | None => Self::Sql(error),
        }
    }
}
