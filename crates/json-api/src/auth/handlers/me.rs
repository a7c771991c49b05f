//! Current User Handlers

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    auth::{
        into_status_error,
        models::{ProfileResponse, ProfileUpdateRequest},
    },
    extensions::*,
    state::State,
};

/// Current User Handler
#[endpoint(
    tags("auth"),
    summary = "Current user",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn show(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let user = state
        .app
        .auth
        .get_user(principal.user_id)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProfileResponse {
        message: None,
        user: user.into(),
    }))
}

/// Update Current User Handler
///
/// Mobile number and password cannot be changed here.
#[endpoint(
    tags("auth"),
    summary = "Update current user",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Profile updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid profile data"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn update(
    json: JsonBody<ProfileUpdateRequest>,
    depot: &mut Depot,
) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let user = state
        .app
        .auth
        .update_profile(principal.user_id, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProfileResponse {
        message: Some("User updated successfully".to_string()),
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use elysian_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER, inject_user};

    use super::{super::tests::make_user, *};

    fn make_service(auth: MockAuthService) -> Service {
        Mocks {
            auth,
            ..Mocks::default()
        }
        .service(
            Router::with_path("user/me")
                .hoop(inject_user)
                .get(show)
                .patch(update),
        )
    }

    #[tokio::test]
    async fn returns_profile_of_principal() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_get_user()
            .once()
            .withf(|user| *user == TEST_USER.user_id)
            .return_once(|user| Ok(make_user(user.into_i64())));

        let mut res = TestClient::get("http://example.com/user/me")
            .send(&make_service(auth))
            .await;

        let body: ProfileResponse = res.take_json().await?;

        assert_eq!(body.user.id, TEST_USER.user_id.into_i64());
        assert!(body.message.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn patch_passes_only_supplied_fields() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_update_profile()
            .once()
            .withf(|_, profile| {
                profile.email.as_deref() == Some("asha@example.com") && profile.first_name.is_none()
            })
            .return_once(|user, _| Ok(make_user(user.into_i64())));

        let mut res = TestClient::patch("http://example.com/user/me")
            .json(&json!({ "email": "asha@example.com" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ProfileResponse = res.take_json().await?;

        assert_eq!(body.message.as_deref(), Some("User updated successfully"));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_alternate_number_returns_400() {
        let mut auth = MockAuthService::new();

        auth.expect_update_profile()
            .once()
            .return_once(|_, _| Err(AuthServiceError::InvalidData("bad number")));

        let res = TestClient::patch("http://example.com/user/me")
            .json(&json!({ "alternate_mobile_number": "123" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
