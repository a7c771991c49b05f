//! Variant Pricing Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use elysian_app::domain::catalog::models::{ProductId, VariantId};

use crate::{
    catalog::{errors::into_status_error, models::VariantPricingResponse},
    extensions::*,
    state::State,
};

/// Variant Pricing Handler
///
/// Unit price breakdown of an orderable variant.
#[endpoint(
    tags("catalog"),
    summary = "Get variant pricing",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Price, discount and final price"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Authentication required"),
        (status_code = StatusCode::NOT_FOUND, description = "Product or variant not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<i64>,
    variant: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<VariantPricingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.actor_or_401()?;

    let details = state
        .app
        .catalog
        .get_orderable_variant(
            ProductId::from_i64(product.into_inner()),
            VariantId::from_i64(variant.into_inner()),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(details.into()))
}

#[cfg(test)]
mod tests {
    use elysian_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, models::VariantDetails,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, inject_session};

    use super::{
        super::tests::{make_product, make_variant},
        *,
    };

    fn make_service(catalog: MockCatalogService) -> Service {
        Mocks {
            catalog,
            ..Mocks::default()
        }
        .service(
            Router::with_path("products/{product}/variants/{variant}/pricing")
                .hoop(inject_session)
                .get(handler),
        )
    }

    #[tokio::test]
    async fn pricing_breaks_down_the_discount() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_orderable_variant()
            .once()
            .withf(|product, variant| product.into_i64() == 7 && variant.into_i64() == 12)
            .return_once(|_, _| {
                Ok(VariantDetails {
                    variant: make_variant(12, "Full", true),
                    product: make_product(true),
                })
            });

        let mut res = TestClient::get("http://example.com/products/7/variants/12/pricing")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Value = res.take_json().await?;

        assert_eq!(
            body,
            json!({
                "product_id": 7,
                "variant_id": 12,
                "original_price": 150.0,
                "discount_percentage": 10.0,
                "discount_amount": 15.0,
                "final_price": 135.0,
                "currency": "INR",
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn variant_of_another_product_is_404() {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_orderable_variant()
            .once()
            .return_once(|_, _| Err(CatalogServiceError::VariantNotFound));

        let res = TestClient::get("http://example.com/products/8/variants/12/pricing")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
