//! Cart Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    carts::models::{CartId, CartItemId, CartLine},
    catalog::models::{ProductId, VariantId},
};

const LIST_CART_LINES_SQL: &str = include_str!("../sql/list_cart_lines.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(LIST_CART_LINES_SQL)
            .bind(cart.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a line or overwrite the quantity of an existing one.
    ///
    /// Returns `true` if a new line was inserted.
    pub(crate) async fn upsert_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
        product: ProductId,
        variant: VariantId,
        quantity: i32,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(UPSERT_CART_ITEM_SQL)
            .bind(cart.into_i64())
            .bind(product.into_i64())
            .bind(variant.into_i64())
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
        product: ProductId,
        variant: VariantId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(cart.into_i64())
            .bind(product.into_i64())
            .bind(variant.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: CartItemId::from_i64(row.try_get("cart_item_id")?),
            cart_id: CartId::from_i64(row.try_get("cart_id")?),
            product_id: ProductId::from_i64(row.try_get("product_id")?),
            product_name: row.try_get("product_name")?,
            variant_id: VariantId::from_i64(row.try_get("variant_id")?),
            variant_size: row.try_get("variant_size")?,
            variant_type: row.try_get("variant_type")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            discount: row.try_get("discount")?,
        })
    }
}
