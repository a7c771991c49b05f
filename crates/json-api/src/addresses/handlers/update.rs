//! Update Address Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;

use elysian_app::domain::addresses::models::AddressId;

use crate::{
    addresses::{
        errors::into_status_error,
        models::{AddressSavedResponse, UpdateAddressRequest},
    },
    extensions::*,
    state::State,
};

/// Update Address Handler
///
/// Partial update of one of the caller's addresses.
#[endpoint(
    tags("addresses"),
    summary = "Update address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid address"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    address: PathParam<i64>,
    json: JsonBody<UpdateAddressRequest>,
    depot: &mut Depot,
) -> Result<Json<AddressSavedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .update_address(
            principal.user_id,
            AddressId::from_i64(address.into_inner()),
            json.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?;

    info!(address_id = %address.id, user_id = %principal.user_id, "address updated");

    Ok(Json(AddressSavedResponse {
        message: "Address updated successfully".to_string(),
        address: address.into(),
    }))
}
