//! Errors

use salvo::http::{StatusCode, StatusError};
use tracing::error;

use elysian_app::domain::carts::CartsServiceError;

/// Status and message for a rejected cart mutation, rendered in the cart shape.
///
/// Storage failures are not rejections; they become a bare 500.
pub(crate) fn rejection(error: CartsServiceError) -> Result<(StatusCode, String), StatusError> {
    let status = match &error {
        CartsServiceError::NegativeQuantity
        | CartsServiceError::QuantityTooLarge
        | CartsServiceError::ProductMismatch => StatusCode::BAD_REQUEST,
        CartsServiceError::VariantNotFound
        | CartsServiceError::ProductUnavailable
        | CartsServiceError::NotFound => StatusCode::NOT_FOUND,
        CartsServiceError::Sql(source) => {
            error!("failed to update cart: {source}");

            return Err(StatusError::internal_server_error());
        }
    };

    Ok((status, error.to_string()))
}

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match rejection(error) {
        Ok((status, message)) => StatusError::from_code(status)
            .unwrap_or_else(StatusError::internal_server_error)
            .brief(message),
        Err(error) => error,
    }
}
