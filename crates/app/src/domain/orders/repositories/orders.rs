//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::{
    auth::UserId,
    domain::orders::models::{
        NewOrder, Order, OrderId, OrderLine, OrderStatus, PaymentId, PaymentStatus,
    },
};

use super::try_get_status;

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const SET_ORDER_PAYMENT_SQL: &str = include_str!("../sql/set_order_payment.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const UPDATE_PENDING_ORDER_STATUS_SQL: &str =
    include_str!("../sql/update_pending_order_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.user_id.into_i64())
            .bind(Json(order.items))
            .bind(order.order_amount)
            .bind(order.delivery_address)
            .bind(order.additional_info)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_order_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        payment: PaymentId,
    ) -> Result<(), sqlx::Error> {
        query(SET_ORDER_PAYMENT_SQL)
            .bind(order.into_i64())
            .bind(payment.into_i64())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(owner.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        owner: UserId,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_i64())
            .bind(owner.into_i64())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Move an order out of `PENDING`. Returns `None` if it already left.
    pub(crate) async fn update_pending_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        payment_status: PaymentStatus,
        order_status: OrderStatus,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_PENDING_ORDER_STATUS_SQL)
            .bind(order.into_i64())
            .bind(payment_status.as_str())
            .bind(order_status.as_str())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(items) = row.try_get::<Json<Vec<OrderLine>>, _>("items")?;

        Ok(Self {
            id: OrderId::from_i64(row.try_get("id")?),
            user_id: UserId::from_i64(row.try_get("user_id")?),
            items,
            order_amount: row.try_get("order_amount")?,
            payment_status: try_get_status(row, "payment_status")?,
            order_status: try_get_status(row, "order_status")?,
            delivery_address: row.try_get("delivery_address")?,
            additional_info: row.try_get("additional_info")?,
            payment_id: row
                .try_get::<Option<i64>, _>("payment_id")?
                .map(PaymentId::from_i64),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
