//! Checkout Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use tracing::info;

use elysian_app::domain::addresses::models::AddressId;

use crate::{
    extensions::*,
    observability::record_checkout,
    orders::{
        errors::{checkout_failure, checkout_outcome},
        models::{CheckoutRequest, CheckoutResponse},
    },
    state::State,
};

/// Checkout Handler
///
/// Turns the caller's cart into a pending order and starts a gateway payment.
/// The client should follow `redirect_url` to pay.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created, payment initiated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or malformed address_id"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Address or cart not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment initiation failed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let request = json.into_inner();

    let address_id = match request.address_id.integer() {
        Ok(Some(address_id)) => address_id,
        Ok(None) => {
            res.status_code(StatusCode::BAD_REQUEST);

            return Ok(Json(CheckoutResponse::failed("address_id is required", None)));
        }
        Err(_) => {
            res.status_code(StatusCode::BAD_REQUEST);

            return Ok(Json(CheckoutResponse::failed(
                "Invalid address_id",
                request
                    .address_id
                    .map(|value| format!("address_id must be a valid integer, got {value}")),
            )));
        }
    };

    let result = state
        .app
        .orders
        .checkout(principal.user_id, AddressId::from_i64(address_id))
        .await;

    match result {
        Ok(receipt) => {
            record_checkout("created");

            info!(
                order_id = %receipt.order_id,
                user_id = %principal.user_id,
                amount = receipt.order_amount,
                "order created"
            );

            res.add_header(LOCATION, format!("/orders/{}", receipt.order_id), true)
                .or_500("failed to set location header")?
                .status_code(StatusCode::CREATED);

            Ok(Json(receipt.into()))
        }
        Err(error) => {
            record_checkout(checkout_outcome(&error));

            let (status, body) = checkout_failure(error)?;

            res.status_code(status);

            Ok(Json(body))
        }
    }
}
