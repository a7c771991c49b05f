//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    auth::UserId,
    domain::catalog::models::{ProductId, VariantId},
    ids::TypedId,
};

/// Order Id
pub type OrderId = TypedId<Order>;

/// Payment Id
pub type PaymentId = TypedId<Payment>;

#[derive(Debug, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(String);

/// Payment Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Order status implied by this payment status, if it implies one.
    #[must_use]
    pub const fn implied_order_status(self) -> Option<OrderStatus> {
        match self {
            Self::Pending => None,
            Self::Completed => Some(OrderStatus::Confirmed),
            Self::Failed => Some(OrderStatus::Cancelled),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Order Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A cart line frozen into an order. Amounts are minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: i32,

    /// Undiscounted unit price.
    pub unit_price: i64,

    /// Discount across the whole line.
    pub discount: i64,

    pub line_total: i64,
    pub product_name: String,
    pub variant_size: String,
    pub variant_type: String,
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,

    /// Total in minor units.
    pub order_amount: i64,

    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub delivery_address: String,
    pub additional_info: Value,
    pub payment_id: Option<PaymentId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payment Model
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: i64,
    pub transaction_id: Option<String>,

    /// Merchant order id we sent to the gateway.
    pub gateway_order_id: String,

    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub additional_info: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub(crate) struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub order_amount: i64,
    pub delivery_address: String,
    pub additional_info: Value,
}

#[derive(Debug, Clone)]
pub(crate) struct NewPayment {
    pub order_id: OrderId,
    pub amount: i64,
    pub gateway_order_id: String,
    pub payment_status: PaymentStatus,
    pub additional_info: Value,
}

/// Changes to a payment learned from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,

    /// Merged into the existing `additional_info`.
    pub info: Value,
}

/// Successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub gateway_order_id: String,
    pub redirect_url: String,
    pub order_amount: i64,
}

/// What happened when order details were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The order was no longer pending.
    NotNeeded,

    /// The gateway reported a final state and it was stored.
    Updated,

    /// The gateway still reports the payment as pending.
    Unchanged,

    /// The gateway could not be reached; stored state was kept.
    Skipped,
}

/// An order with its payments.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub order: Order,

    /// Most recent first.
    pub payments: Vec<Payment>,

    pub reconciliation: Reconciliation,
}

impl OrderDetails {
    /// The payment has reached a final state.
    #[must_use]
    pub fn status_updated(&self) -> bool {
        self.order.payment_status != PaymentStatus::Pending
    }
}
