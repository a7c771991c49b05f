//! List Product Variants Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use elysian_app::domain::catalog::models::ProductId;

use crate::{
    catalog::{errors::into_status_error, models::ProductVariantsResponse},
    extensions::*,
    state::State,
};

/// List Product Variants Handler
///
/// Lists the orderable variants of an available product.
#[endpoint(
    tags("catalog"),
    summary = "List product variants",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product with its variants"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found or unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<ProductVariantsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.actor_or_401()?;

    let listing = state
        .app
        .catalog
        .list_available_variants(ProductId::from_i64(product.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(listing.into()))
}
