//! Get Variant Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use elysian_app::domain::catalog::models::VariantId;

use crate::{
    catalog::{errors::into_status_error, models::VariantDetailsResponse},
    extensions::*,
    state::State,
};

/// Get Variant Handler
///
/// Staff view of any variant, including unavailable ones.
#[endpoint(
    tags("admin"),
    summary = "Get variant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Variant with its product"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::FORBIDDEN, description = "Staff only"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<VariantDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.principal_or_401()?;

    let details = state
        .app
        .catalog
        .get_variant(VariantId::from_i64(variant.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}
