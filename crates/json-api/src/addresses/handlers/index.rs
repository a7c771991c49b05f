//! List Addresses Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    addresses::{errors::into_status_error, models::AddressesResponse},
    extensions::*,
    state::State,
};

/// List Addresses Handler
#[endpoint(
    tags("addresses"),
    summary = "List addresses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Addresses, default first"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AddressesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(principal.user_id)
        .await
        .map_err(into_status_error)?;

    Ok(Json(AddressesResponse {
        addresses: addresses.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use elysian_app::domain::addresses::MockAddressesService;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER, inject_user};

    use super::{super::tests::make_address, *};

    #[tokio::test]
    async fn lists_principals_addresses() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_list_addresses()
            .once()
            .withf(|owner| *owner == TEST_USER.user_id)
            .return_once(|owner| {
                Ok(vec![
                    make_address(2, owner, true),
                    make_address(1, owner, false),
                ])
            });

        let service = Mocks {
            addresses,
            ..Mocks::default()
        }
        .service(Router::with_path("user/addresses").hoop(inject_user).get(handler));

        let mut res = TestClient::get("http://example.com/user/addresses")
            .send(&service)
            .await;

        let body: AddressesResponse = res.take_json().await?;

        let ids: Vec<i64> = body.addresses.iter().map(|address| address.id).collect();

        assert_eq!(ids, vec![2, 1]);
        assert!(body.addresses.first().is_some_and(|address| address.is_default));

        Ok(())
    }
}
