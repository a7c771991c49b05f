//! Refresh Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    auth::{into_status_error, models::RefreshResponse},
    extensions::*,
    state::State,
};

/// Refresh Handler
///
/// Rotates the refresh token: the presented one is blacklisted and a new pair
/// is issued.
#[endpoint(
    tags("auth"),
    summary = "Rotate refresh token",
    responses(
        (status_code = StatusCode::OK, description = "Tokens rotated"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid or revoked refresh token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RefreshResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let token = depot.refresh_token_or_401()?;

    let tokens = state
        .app
        .auth
        .rotate_refresh_token(token)
        .await
        .map_err(into_status_error)?;

    state.cookies.set_tokens(res, &tokens);

    Ok(Json(RefreshResponse {
        message: "Token refreshed".to_string(),
        access_token: tokens.access_token,
    }))
}

#[cfg(test)]
mod tests {
    use elysian_app::auth::{AuthServiceError, MockAuthService};
    use salvo::{
        http::header::COOKIE,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::{auth::middleware::refresh_only, test_helpers::{Mocks, TEST_USER}};

    use super::{super::tests::make_tokens, *};

    fn make_service(auth: MockAuthService) -> Service {
        Mocks {
            auth,
            ..Mocks::default()
        }
        .service(
            Router::with_path("user/refresh")
                .hoop(refresh_only)
                .post(handler),
        )
    }

    #[tokio::test]
    async fn refresh_rotates_tokens() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_refresh()
            .once()
            .withf(|token| token == "refresh-0")
            .return_once(|_| Ok(TEST_USER));
        auth.expect_rotate_refresh_token()
            .once()
            .withf(|token| token == "refresh-0")
            .return_once(|_| Ok(make_tokens()));

        let mut res = TestClient::post("http://example.com/user/refresh")
            .add_header(COOKIE, "refresh_token=refresh-0", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: RefreshResponse = res.take_json().await?;

        assert_eq!(body.access_token, "access-1");

        Ok(())
    }

    #[tokio::test]
    async fn lost_rotation_race_returns_401() {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_refresh()
            .once()
            .return_once(|_| Ok(TEST_USER));
        auth.expect_rotate_refresh_token()
            .once()
            .return_once(|_| Err(AuthServiceError::AuthenticationRequired));

        let res = TestClient::post("http://example.com/user/refresh")
            .add_header(COOKIE, "refresh_token=refresh-0", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }
}
