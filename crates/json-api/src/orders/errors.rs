//! Errors

use salvo::http::{StatusCode, StatusError};
use tracing::{error, warn};

use elysian_app::domain::orders::OrdersServiceError;

use crate::orders::models::CheckoutResponse;

/// Outcome label used for the checkout counter.
pub(crate) fn checkout_outcome(error: &OrdersServiceError) -> &'static str {
    match error {
        OrdersServiceError::AddressNotFound | OrdersServiceError::NotFound => "not_found",
        OrdersServiceError::CartNotFound | OrdersServiceError::EmptyCart => "empty_cart",
        OrdersServiceError::AmountOutOfRange => "rejected",
        OrdersServiceError::PaymentInitiationFailed(_) => "payment_failed",
        OrdersServiceError::Sql(_) => "error",
    }
}

/// Status and `{error, details}` body for a failed checkout.
///
/// Storage failures are logged and become a bare 500.
pub(crate) fn checkout_failure(
    error: OrdersServiceError,
) -> Result<(StatusCode, CheckoutResponse), StatusError> {
    match error {
        OrdersServiceError::AddressNotFound
        | OrdersServiceError::CartNotFound
        | OrdersServiceError::EmptyCart
        | OrdersServiceError::NotFound => Ok((
            StatusCode::NOT_FOUND,
            CheckoutResponse::failed(error.to_string(), None),
        )),
        OrdersServiceError::AmountOutOfRange => Ok((
            StatusCode::BAD_REQUEST,
            CheckoutResponse::failed(error.to_string(), None),
        )),
        OrdersServiceError::PaymentInitiationFailed(source) => {
            warn!("payment initiation failed: {source}");

            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutResponse::failed("Payment initiation failed", Some(source.to_string())),
            ))
        }
        OrdersServiceError::Sql(source) => {
            error!("checkout storage error: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
        error => {
            error!("unexpected order error: {error}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use elysian_app::payments::GatewayError;

    use super::*;

    #[test]
    fn gateway_failure_carries_details() {
        let failure = checkout_failure(OrdersServiceError::PaymentInitiationFailed(
            GatewayError::Timeout,
        ))
        .ok();

        assert!(
            matches!(
                &failure,
                Some((StatusCode::INTERNAL_SERVER_ERROR, body))
                    if body.error.as_deref() == Some("Payment initiation failed")
                        && body.details.as_deref() == Some("payment gateway timed out")
            ),
            "expected 500 with gateway details, got {failure:?}"
        );
    }

    #[test]
    fn empty_cart_is_not_found() {
        let failure = checkout_failure(OrdersServiceError::EmptyCart).ok();

        assert!(
            matches!(&failure, Some((StatusCode::NOT_FOUND, body)) if body.error.as_deref() == Some("Cart is empty")),
            "expected 404 Cart is empty, got {failure:?}"
        );
    }
}
