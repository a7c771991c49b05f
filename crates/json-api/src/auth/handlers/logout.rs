//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::info;

use crate::{
    auth::{into_status_error, middleware::presented_credentials, models::LogoutResponse},
    extensions::*,
    state::State,
};

/// Logout Handler
///
/// Revokes whatever refresh token was presented and hands out a fresh
/// anonymous session. Expired or missing credentials are not an error.
#[endpoint(
    tags("auth"),
    summary = "Logout",
    responses(
        (status_code = StatusCode::OK, description = "Logged out"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<LogoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let credentials = presented_credentials(req, &state.cookies);

    let outcome = state
        .app
        .auth
        .logout(&credentials)
        .await
        .map_err(into_status_error)?;

    info!(
        session_id = %outcome.session.id,
        refresh_revoked = outcome.refresh_revoked,
        "logged out"
    );

    state.cookies.set_session(res, &outcome.session);

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
        session_id: outcome.session.id.to_string(),
    }))
}
