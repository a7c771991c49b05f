//! Delete Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use elysian_app::domain::addresses::models::AddressId;

use crate::{
    addresses::{errors::into_status_error, models::MessageResponse},
    extensions::*,
    state::State,
};

/// Delete Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Delete address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Address not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    address: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .addresses
        .delete_address(principal.user_id, AddressId::from_i64(address.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(MessageResponse {
        message: "Address deleted successfully".to_string(),
    }))
}
