//! Create Address Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use tracing::info;

use crate::{
    addresses::{
        errors::into_status_error,
        models::{AddressSavedResponse, CreateAddressRequest},
    },
    extensions::*,
    state::State,
};

/// Create Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Add address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid address"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressSavedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let address = state
        .app
        .addresses
        .create_address(principal.user_id, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(address_id = %address.id, user_id = %principal.user_id, "address created");

    res.add_header(LOCATION, format!("/user/addresses/{}", address.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(AddressSavedResponse {
        message: "Address added successfully".to_string(),
        address: address.into(),
    }))
}

#[cfg(test)]
mod tests {
    use elysian_app::domain::addresses::{AddressesServiceError, MockAddressesService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER, inject_user};

    use super::{super::tests::make_address, *};

    fn make_service(addresses: MockAddressesService) -> Service {
        Mocks {
            addresses,
            ..Mocks::default()
        }
        .service(Router::with_path("user/addresses").hoop(inject_user).post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "name": "Home",
            "address": "12 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
            "is_default": true,
        })
    }

    #[tokio::test]
    async fn create_returns_201_with_location() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_create_address()
            .once()
            .withf(|owner, address| {
                *owner == TEST_USER.user_id && address.is_default && address.country.is_none()
            })
            .return_once(|owner, _| Ok(make_address(9, owner, true)));

        let mut res = TestClient::post("http://example.com/user/addresses")
            .json(&body())
            .send(&make_service(addresses))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            res.headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/user/addresses/9")
        );

        let body: AddressSavedResponse = res.take_json().await?;

        assert_eq!(body.message, "Address added successfully");
        assert_eq!(body.address.country, "India");

        Ok(())
    }

    #[tokio::test]
    async fn invalid_pincode_returns_400() {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_create_address()
            .once()
            .return_once(|_, _| {
                Err(AddressesServiceError::InvalidData(
                    "Pincode must be exactly 6 digits",
                ))
            });

        let res = TestClient::post("http://example.com/user/addresses")
            .json(&body())
            .send(&make_service(addresses))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
