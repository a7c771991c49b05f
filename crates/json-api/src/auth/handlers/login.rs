//! Login Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use elysian_app::auth::Password;

use crate::{
    auth::{
        into_status_error,
        models::{AuthResponse, LoginRequest},
    },
    extensions::*,
    state::State,
};

/// Login Handler
///
/// Swaps any anonymous session for an access and refresh token pair.
#[endpoint(
    tags("auth"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Logged in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid mobile number or password"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AuthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let outcome = state
        .app
        .auth
        .login(&request.mobile_number, &Password::new(request.password))
        .await
        .map_err(into_status_error)?;

    state.cookies.set_tokens(res, &outcome.tokens);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: outcome.user.into(),
        access_token: outcome.tokens.access_token,
    }))
}
