//! Upsert Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::debug;

use elysian_app::domain::{
    carts::models::{CartChange, CartItemUpsert},
    catalog::models::{ProductId, VariantId},
};

use crate::{
    carts::{
        errors::rejection,
        models::{CartResponse, UpsertCartItemRequest},
    },
    extensions::*,
    state::State,
};

fn change_message(change: CartChange) -> &'static str {
    match change {
        CartChange::Saved => "Item added to cart successfully",
        CartChange::Removed => "Item removed from cart successfully",
        CartChange::Absent => "Item was not in cart",
    }
}

fn bad_request(res: &mut Response, message: &str) -> Json<CartResponse> {
    res.status_code(StatusCode::BAD_REQUEST);

    Json(CartResponse::rejected(message))
}

/// Upsert Cart Item Handler
///
/// Sets the quantity of a line, creating the cart if needed. A quantity of 0
/// removes the line. Rejections answer in the same shape as successes.
#[endpoint(
    tags("cart"),
    summary = "Add, update or remove a cart item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid cart item"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant or product not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpsertCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let request = json.into_inner();

    let variant_id = match request.variant_id.integer() {
        Ok(Some(variant_id)) => variant_id,
        Ok(None) => return Ok(bad_request(res, "variant_id is required")),
        Err(_) => return Ok(bad_request(res, "variant_id must be a valid integer")),
    };

    let Ok(product_id) = request.product_id.integer() else {
        return Ok(bad_request(res, "product_id must be a valid integer"));
    };

    let Ok(quantity) = request.quantity.integer() else {
        return Ok(bad_request(res, "quantity must be a valid integer"));
    };

    let upsert = CartItemUpsert {
        product_id: product_id.map(ProductId::from_i64),
        variant_id: VariantId::from_i64(variant_id),
        quantity: quantity.unwrap_or(1),
    };

    match state.app.carts.upsert_item(actor.into(), upsert).await {
        Ok(update) => Ok(Json(CartResponse::new(
            update.cart,
            Some(change_message(update.change).to_string()),
        ))),
        Err(error) => {
            let (status, message) = rejection(error)?;

            debug!(%status, %message, "cart item rejected");

            res.status_code(status);

            Ok(Json(CartResponse::rejected(message)))
        }
    }
}
