//! Register Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    auth::{
        into_status_error,
        models::{AuthResponse, RegisterRequest},
    },
    extensions::*,
    state::State,
};

/// Register Handler
///
/// Creates a customer account and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid registration data"),
        (status_code = StatusCode::CONFLICT, description = "Mobile number already registered"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AuthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = state
        .app
        .auth
        .register(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    state.cookies.set_tokens(res, &outcome.tokens);
    res.status_code(StatusCode::CREATED);

    Ok(Json(AuthResponse {
        message: "User registered successfully".to_string(),
        user: outcome.user.into(),
        access_token: outcome.tokens.access_token,
    }))
}

#[cfg(test)]
mod tests {
    use elysian_app::auth::{AuthServiceError, LoginOutcome, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{cookies::tests::set_cookies, test_helpers::Mocks};

    use super::{super::tests::*, *};

    fn make_service(auth: MockAuthService) -> Service {
        Mocks {
            auth,
            ..Mocks::default()
        }
        .service(Router::with_path("user/register").post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "mobile_number": "9876543210",
            "password": "paneer-tikka-42",
            "password_confirm": "paneer-tikka-42",
            "first_name": "Asha",
            "last_name": "Rao",
        })
    }

    #[tokio::test]
    async fn register_sets_token_cookies_and_returns_201() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|user| {
                user.mobile_number == "9876543210"
                    && user.password.expose() == "paneer-tikka-42"
                    && user.email.is_none()
            })
            .return_once(|_| {
                Ok(LoginOutcome {
                    user: make_user(3),
                    tokens: make_tokens(),
                })
            });

        let mut res = TestClient::post("http://example.com/user/register")
            .json(&body())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let cookies = set_cookies(&res);

        assert!(
            cookies.contains(&("access_token".to_string(), "access-1".to_string(), Some(3_600))),
            "expected access cookie, got {cookies:?}"
        );
        assert!(
            cookies.iter().any(|(name, value, _)| name == "refresh_token" && value == "refresh-1"),
            "expected refresh cookie, got {cookies:?}"
        );
        assert!(
            cookies.iter().any(|(name, value, _)| name == "session_id" && value.is_empty()),
            "expected session cookie removal, got {cookies:?}"
        );

        let body: AuthResponse = res.take_json().await?;

        assert_eq!(body.message, "User registered successfully");
        assert_eq!(body.user.id, 3);
        assert_eq!(body.access_token, "access-1");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_mobile_number_returns_409() {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/user/register")
            .json(&body())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn invalid_data_returns_400() {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::InvalidData("Passwords don't match")));

        let res = TestClient::post("http://example.com/user/register")
            .json(&body())
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
