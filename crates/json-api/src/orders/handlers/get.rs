//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::debug;

use elysian_app::domain::orders::models::OrderId;

use crate::{
    extensions::*,
    observability::record_reconciliation,
    orders::{
        errors::into_status_error,
        models::{OrderDetailsResponse, reconciliation_outcome},
    },
    state::State,
};

/// Get Order Handler
///
/// Returns an order with its payments. A pending order is checked against
/// the payment gateway first; if the gateway is unreachable the stored state
/// is returned.
#[endpoint(
    tags("orders"),
    summary = "Get order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order details"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let details = state
        .app
        .orders
        .get_order_details(principal.user_id, OrderId::from_i64(order.into_inner()))
        .await
        .map_err(into_status_error)?;

    let outcome = reconciliation_outcome(details.reconciliation);

    record_reconciliation(outcome);

    debug!(order_id = %details.order.id, outcome, "order details read");

    Ok(Json(details.into()))
}
