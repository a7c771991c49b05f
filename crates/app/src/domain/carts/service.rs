//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartChange, CartItemUpsert, CartOwner, CartUpdate, CartView},
            pricing::price_cart,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        catalog::{models::VariantDetails, repository::PgCatalogRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }

    async fn orderable_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &CartItemUpsert,
    ) -> Result<VariantDetails, CartsServiceError> {
        let details = self
            .catalog_repository
            .get_variant_details(tx, item.variant_id)
            .await?
            .filter(|details| details.variant.is_available)
            .ok_or(CartsServiceError::VariantNotFound)?;

        if let Some(product) = item.product_id
            && product != details.product.id
        {
            return Err(CartsServiceError::ProductMismatch);
        }

        if !details.product.is_available {
            return Err(CartsServiceError::ProductUnavailable);
        }

        Ok(details)
    }

    async fn view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: Option<&Cart>,
    ) -> Result<CartView, CartsServiceError> {
        let Some(cart) = cart else {
            return Ok(CartView::default());
        };

        let lines = self.items_repository.list_cart_lines(tx, cart.id).await?;

        Ok(price_cart(lines))
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn resolve_or_create_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .resolve_or_create_cart(&mut tx, owner)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn upsert_item(
        &self,
        owner: CartOwner,
        item: CartItemUpsert,
    ) -> Result<CartUpdate, CartsServiceError> {
        if item.quantity < 0 {
            return Err(CartsServiceError::NegativeQuantity);
        }

        let quantity =
            i32::try_from(item.quantity).map_err(|_err| CartsServiceError::QuantityTooLarge)?;

        let mut tx = self.db.begin().await?;

        let details = self.orderable_variant(&mut tx, &item).await?;

        let (change, cart) = if quantity == 0 {
            let cart = self.carts_repository.find_cart(&mut tx, owner).await?;

            let removed = match &cart {
                Some(cart) => {
                    self.items_repository
                        .delete_cart_item(&mut tx, cart.id, details.product.id, details.variant.id)
                        .await?
                }
                None => 0,
            };

            let change = if removed > 0 {
                CartChange::Removed
            } else {
                CartChange::Absent
            };

            (change, cart)
        } else {
            let cart = self
                .carts_repository
                .resolve_or_create_cart(&mut tx, owner)
                .await?;

            let inserted = self
                .items_repository
                .upsert_cart_item(
                    &mut tx,
                    cart.id,
                    details.product.id,
                    details.variant.id,
                    quantity,
                )
                .await?;

            debug!(
                cart_id = %cart.id,
                variant_id = %details.variant.id,
                quantity,
                inserted,
                "cart line saved"
            );

            (CartChange::Saved, Some(cart))
        };

        if let Some(cart) = &cart
            && change != CartChange::Absent
        {
            self.carts_repository.touch_cart(&mut tx, cart.id).await?;
        }

        let view = self.view(&mut tx, cart.as_ref()).await?;

        tx.commit().await?;

        Ok(CartUpdate { change, cart: view })
    }

    async fn list_items(&self, owner: CartOwner) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.find_cart(&mut tx, owner).await?;
        let view = self.view(&mut tx, cart.as_ref()).await?;

        tx.commit().await?;

        Ok(view)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Find the owner's cart, creating it if it does not exist yet.
    async fn resolve_or_create_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError>;

    /// Add, overwrite or remove a line and return the updated cart.
    ///
    /// A quantity of `0` removes the line; removing an absent line succeeds with
    /// [`CartChange::Absent`]. Negative quantities are rejected.
    async fn upsert_item(
        &self,
        owner: CartOwner,
        item: CartItemUpsert,
    ) -> Result<CartUpdate, CartsServiceError>;

    /// Priced contents of the owner's cart. Owners without a cart get an empty view.
    async fn list_items(&self, owner: CartOwner) -> Result<CartView, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        auth::SessionId,
        domain::catalog::models::VariantId,
        test::{
            TestContext,
            helpers::{insert_product, insert_variant, register_user},
        },
    };

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str_exact(value).expect("valid decimal literal")
    }

    fn upsert(variant: VariantId, quantity: i64) -> CartItemUpsert {
        CartItemUpsert {
            product_id: None,
            variant_id: variant,
            quantity,
        }
    }

    #[tokio::test]
    async fn repeat_add_overwrites_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Paneer Tikka", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Full", dec("250.00"), true).await?;
        let owner = CartOwner::Session(SessionId::generate());

        ctx.carts.upsert_item(owner, upsert(variant, 2)).await?;
        let update = ctx.carts.upsert_item(owner, upsert(variant, 3)).await?;

        assert_eq!(update.change, CartChange::Saved);
        assert_eq!(update.cart.total_items, 1);
        assert_eq!(
            update.cart.items.first().map(|i| i.line.quantity),
            Some(3),
            "expected quantity to be overwritten, not incremented"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_prices_lines_with_discount() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Biryani", dec("10.00"), true).await?;
        let variant = insert_variant(&ctx, product, "Half", dec("180.00"), true).await?;
        let user = register_user(&ctx, "9876543210").await?;
        let owner = CartOwner::User(user);

        ctx.carts
            .upsert_item(
                owner,
                CartItemUpsert {
                    product_id: Some(product),
                    variant_id: variant,
                    quantity: 3,
                },
            )
            .await?;

        let view = ctx.carts.list_items(owner).await?;

        let item = view.items.first();

        assert_eq!(item.map(|i| i.discounted_price), Some(dec("162.00")));
        assert_eq!(item.map(|i| i.item_total), Some(dec("486.00")));
        assert_eq!(view.total_amount, dec("486.00"));

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_removes_line() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Lassi", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Large", dec("90.00"), true).await?;
        let owner = CartOwner::Session(SessionId::generate());

        ctx.carts.upsert_item(owner, upsert(variant, 1)).await?;
        let update = ctx.carts.upsert_item(owner, upsert(variant, 0)).await?;

        assert_eq!(update.change, CartChange::Removed);
        assert!(update.cart.items.is_empty(), "expected cart to be empty");

        Ok(())
    }

    #[tokio::test]
    async fn removing_absent_line_is_not_an_error() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Lassi", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Large", dec("90.00"), true).await?;
        let owner = CartOwner::Session(SessionId::generate());

        let update = ctx.carts.upsert_item(owner, upsert(variant, 0)).await?;

        assert_eq!(update.change, CartChange::Absent);
        assert_eq!(update.cart, CartView::default());

        Ok(())
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Lassi", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Large", dec("90.00"), true).await?;
        let owner = CartOwner::Session(SessionId::generate());

        let result = ctx.carts.upsert_item(owner, upsert(variant, -1)).await;

        assert!(
            matches!(result, Err(CartsServiceError::NegativeQuantity)),
            "expected NegativeQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Idli", Decimal::ZERO, true).await?;
        let other = insert_product(&ctx, "Vada", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Plate", dec("60.00"), true).await?;
        let owner = CartOwner::Session(SessionId::generate());

        let result = ctx
            .carts
            .upsert_item(
                owner,
                CartItemUpsert {
                    product_id: Some(other),
                    variant_id: variant,
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductMismatch)),
            "expected ProductMismatch, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_variant_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Idli", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Plate", dec("60.00"), false).await?;
        let owner = CartOwner::Session(SessionId::generate());

        let result = ctx.carts.upsert_item(owner, upsert(variant, 1)).await;

        assert!(
            matches!(result, Err(CartsServiceError::VariantNotFound)),
            "expected VariantNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_product_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Idli", Decimal::ZERO, false).await?;
        let variant = insert_variant(&ctx, product, "Plate", dec("60.00"), true).await?;
        let owner = CartOwner::Session(SessionId::generate());

        let result = ctx.carts.upsert_item(owner, upsert(variant, 1)).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductUnavailable)),
            "expected ProductUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_variant_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = CartOwner::Session(SessionId::generate());

        let result = ctx
            .carts
            .upsert_item(
                owner,
                upsert(VariantId::from_i64(9_999), 1),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::VariantNotFound)),
            "expected VariantNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn session_and_user_carts_are_separate() -> TestResult {
        let ctx = TestContext::new().await;
        let product = insert_product(&ctx, "Chai", Decimal::ZERO, true).await?;
        let variant = insert_variant(&ctx, product, "Cup", dec("20.00"), true).await?;
        let user = register_user(&ctx, "9876543210").await?;
        let session = SessionId::generate();

        ctx.carts
            .upsert_item(CartOwner::Session(session), upsert(variant, 2))
            .await?;

        let user_cart = ctx.carts.list_items(CartOwner::User(user)).await?;

        assert!(user_cart.items.is_empty(), "expected no merge across owners");

        let session_cart = ctx.carts.resolve_or_create_cart(CartOwner::Session(session)).await?;
        let again = ctx.carts.resolve_or_create_cart(CartOwner::Session(session)).await?;

        assert_eq!(session_cart.id, again.id);
        assert_eq!(session_cart.owner, CartOwner::Session(session));

        Ok(())
    }

    #[tokio::test]
    async fn owner_without_cart_lists_empty() -> TestResult {
        let ctx = TestContext::new().await;

        let view = ctx
            .carts
            .list_items(CartOwner::Session(SessionId::generate()))
            .await?;

        assert_eq!(view, CartView::default());

        Ok(())
    }
}
