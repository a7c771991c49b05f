//! Session Bootstrap Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::debug;

use elysian_app::auth::SessionBootstrap;

use crate::{
    auth::{into_status_error, middleware::presented_credentials, models::SessionResponse},
    extensions::*,
    state::State,
};

/// Session Bootstrap Handler
///
/// Safe to call on every page load. A valid refresh token renews the access
/// token; otherwise a live session is reused or a new one is created.
#[endpoint(
    tags("auth"),
    summary = "Bootstrap session",
    responses(
        (status_code = StatusCode::OK, description = "Session created or access token refreshed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let credentials = presented_credentials(req, &state.cookies);

    let bootstrap = state
        .app
        .auth
        .bootstrap_session(&credentials)
        .await
        .map_err(into_status_error)?;

    let response = match bootstrap {
        SessionBootstrap::AccessRefreshed { access_token } => {
            state.cookies.set_access(res, &access_token);

            SessionResponse {
                message: "Access token refreshed".to_string(),
                session_id: None,
                access_token: Some(access_token),
            }
        }
        SessionBootstrap::SessionCreated { session, reused } => {
            debug!(session_id = %session.id, reused, "session bootstrapped");

            state.cookies.set_session(res, &session);

            SessionResponse {
                message: "Session created".to_string(),
                session_id: Some(session.id.to_string()),
                access_token: None,
            }
        }
    };

    Ok(Json(response))
}
