//! List Categories Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    catalog::{errors::into_status_error, models::CategoryResponse},
    extensions::*,
    state::State,
};

/// List Categories Handler
#[endpoint(
    tags("catalog"),
    summary = "List categories",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Available categories"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<CategoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.actor_or_401()?;

    let categories = state
        .app
        .catalog
        .list_categories()
        .await
        .map_err(into_status_error)?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}
