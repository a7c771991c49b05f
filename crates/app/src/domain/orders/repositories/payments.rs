//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::orders::models::{NewPayment, OrderId, Payment, PaymentId, PaymentUpdate};

use super::try_get_status;

const CREATE_PAYMENT_SQL: &str = include_str!("../sql/create_payment.sql");
const LIST_PAYMENTS_SQL: &str = include_str!("../sql/list_payments.sql");
const UPDATE_PAYMENT_STATUS_SQL: &str = include_str!("../sql/update_payment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: NewPayment,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(CREATE_PAYMENT_SQL)
            .bind(payment.order_id.into_i64())
            .bind(payment.amount)
            .bind(payment.gateway_order_id)
            .bind(payment.payment_status.as_str())
            .bind(payment.additional_info)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_payments(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        query_as::<Postgres, Payment>(LIST_PAYMENTS_SQL)
            .bind(order.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentId,
        update: PaymentUpdate,
    ) -> Result<Payment, sqlx::Error> {
        query_as::<Postgres, Payment>(UPDATE_PAYMENT_STATUS_SQL)
            .bind(payment.into_i64())
            .bind(update.payment_status.as_str())
            .bind(update.transaction_id)
            .bind(update.payment_method)
            .bind(update.info)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Payment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: PaymentId::from_i64(row.try_get("id")?),
            order_id: OrderId::from_i64(row.try_get("order_id")?),
            amount: row.try_get("amount")?,
            transaction_id: row.try_get("transaction_id")?,
            gateway_order_id: row.try_get("gateway_order_id")?,
            payment_status: try_get_status(row, "payment_status")?,
            payment_method: row.try_get("payment_method")?,
            additional_info: row.try_get("additional_info")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
