//! Order request and response bodies.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use elysian_app::domain::orders::models::{
    CheckoutReceipt, Order, OrderDetails, OrderLine, Payment, Reconciliation,
};

use crate::carts::models::money;

/// Minor units (paise) to major units for display.
fn major(amount_minor: i64) -> f64 {
    money(Decimal::new(amount_minor, 2))
}

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    #[salvo(schema(value_type = Option<i64>))]
    pub address_id: Option<Value>,
}

/// `{success, order_id, redirect_url, message}` or `{error, details}`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckoutResponse {
    pub(crate) fn failed(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error: Some(error.into()),
            details,
            ..Self::default()
        }
    }
}

impl From<CheckoutReceipt> for CheckoutResponse {
    fn from(receipt: CheckoutReceipt) -> Self {
        Self {
            success: Some(true),
            order_id: Some(receipt.order_id.into_i64()),
            redirect_url: Some(receipt.redirect_url),
            message: Some("Order created successfully".to_string()),
            ..Self::default()
        }
    }
}

/// Order line as frozen at checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub product_id: i64,
    pub variant_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount: f64,
    pub line_total: f64,
    pub product_name: String,
    pub variant_size: String,
    pub variant_type: String,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            product_id: line.product_id.into_i64(),
            variant_id: line.variant_id.into_i64(),
            quantity: line.quantity,
            unit_price: major(line.unit_price),
            discount: major(line.discount),
            line_total: major(line.line_total),
            product_name: line.product_name,
            variant_size: line.variant_size,
            variant_type: line.variant_type,
        }
    }
}

/// Order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub id: i64,
    pub items: Vec<OrderLineResponse>,
    pub order_amount: f64,
    pub payment_status: String,
    pub order_status: String,
    pub delivery_address: String,
    pub payment_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.into_i64(),
            items: order.items.into_iter().map(Into::into).collect(),
            order_amount: major(order.order_amount),
            payment_status: order.payment_status.to_string(),
            order_status: order.order_status.to_string(),
            delivery_address: order.delivery_address,
            payment_id: order.payment_id.map(|id| id.into_i64()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Payment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub id: i64,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub gateway_order_id: String,
    pub payment_status: String,
    pub payment_method: String,
    pub created_at: String,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.into_i64(),
            amount: major(payment.amount),
            transaction_id: payment.transaction_id,
            gateway_order_id: payment.gateway_order_id,
            payment_status: payment.payment_status.to_string(),
            payment_method: payment.payment_method,
            created_at: payment.created_at.to_string(),
        }
    }
}

/// Order History
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

/// Order Details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub payments: Vec<PaymentResponse>,

    /// The payment has reached a final state.
    pub status_updated: bool,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        let status_updated = details.status_updated();

        Self {
            order: details.order.into(),
            payments: details.payments.into_iter().map(Into::into).collect(),
            status_updated,
        }
    }
}

pub(crate) fn reconciliation_outcome(reconciliation: Reconciliation) -> &'static str {
    match reconciliation {
        Reconciliation::NotNeeded => "not_needed",
        Reconciliation::Updated => "updated",
        Reconciliation::Unchanged => "unchanged",
        Reconciliation::Skipped => "skipped",
    }
}
