//! Test Helpers

use rust_decimal::Decimal;
use sqlx::query_scalar;

use crate::{
    auth::{AuthService, NewUser, Password, UserId},
    domain::{
        addresses::models::NewAddress,
        catalog::models::{CategoryId, ProductId, VariantId},
    },
    test::TestContext,
};

pub(crate) const TEST_PASSWORD: &str = "paneer-tikka-42";

pub(crate) fn new_user(mobile_number: &str) -> NewUser {
    NewUser {
        mobile_number: mobile_number.to_string(),
        alternate_mobile_number: None,
        password: Password::new(TEST_PASSWORD),
        password_confirm: Password::new(TEST_PASSWORD),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        email: None,
    }
}

/// Register a customer and return their id.
pub(crate) async fn register_user(
    ctx: &TestContext,
    mobile_number: &str,
) -> Result<UserId, crate::auth::AuthServiceError> {
    let outcome = ctx.auth.register(new_user(mobile_number)).await?;

    Ok(outcome.user.id)
}

pub(crate) fn new_address(is_default: bool) -> NewAddress {
    NewAddress {
        name: "Home".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560001".to_string(),
        country: None,
        is_default,
    }
}

pub(crate) async fn insert_product(
    ctx: &TestContext,
    name: &str,
    discount: Decimal,
    is_available: bool,
) -> Result<ProductId, sqlx::Error> {
    let id: i64 = query_scalar(
        "INSERT INTO products (name, description, discount, is_available) \
         VALUES ($1, '', $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(discount)
    .bind(is_available)
    .fetch_one(ctx.db.pool())
    .await?;

    Ok(ProductId::from_i64(id))
}

pub(crate) async fn insert_variant(
    ctx: &TestContext,
    product: ProductId,
    size: &str,
    price: Decimal,
    is_available: bool,
) -> Result<VariantId, sqlx::Error> {
    let id: i64 = query_scalar(
        "INSERT INTO variants (product_id, size, variant_type, price, is_available) \
         VALUES ($1, $2, 'Veg', $3, $4) RETURNING id",
    )
    .bind(product.into_i64())
    .bind(size)
    .bind(price)
    .bind(is_available)
    .fetch_one(ctx.db.pool())
    .await?;

    Ok(VariantId::from_i64(id))
}

pub(crate) async fn insert_category(
    ctx: &TestContext,
    name: &str,
    is_available: bool,
) -> Result<CategoryId, sqlx::Error> {
    let id: i64 = query_scalar(
        "INSERT INTO categories (name, category_type, is_available) \
         VALUES ($1, 'veg', $2) RETURNING id",
    )
    .bind(name)
    .bind(is_available)
    .fetch_one(ctx.db.pool())
    .await?;

    Ok(CategoryId::from_i64(id))
}
