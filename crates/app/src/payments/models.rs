//! Payment gateway models.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

/// State reported by the gateway for an order or payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GatewayState {
    Pending,
    Completed,
    Failed,

    /// Any state the gateway adds later.
    Other(String),
}

impl From<String> for GatewayState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<GatewayState> for String {
    fn from(state: GatewayState) -> Self {
        match state {
            GatewayState::Pending => "PENDING".to_string(),
            GatewayState::Completed => "COMPLETED".to_string(),
            GatewayState::Failed => "FAILED".to_string(),
            GatewayState::Other(value) => value,
        }
    }
}

/// A request to start a hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Our merchant order id, unique per attempt.
    pub gateway_order_id: String,

    /// Amount in minor units.
    pub amount_minor: i64,

    /// Where the gateway sends the customer afterwards.
    pub callback_url: String,
}

/// The gateway's answer to a [`PaymentRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedPayment {
    /// The gateway's own id for the order, if it sent one.
    pub gateway_reference: Option<String>,

    pub state: GatewayState,

    /// Hosted checkout page for the customer.
    pub redirect_url: String,

    /// Epoch milliseconds after which the checkout page expires.
    pub expire_at: Option<i64>,
}

/// One payment attempt reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentAttempt {
    pub transaction_id: Option<String>,
    pub payment_mode: Option<String>,
    pub timestamp: Option<i64>,
    pub error_code: Option<String>,
    pub detailed_error_code: Option<String>,
}

/// Order status as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrderStatus {
    pub state: GatewayState,

    /// Most recent attempt first when built with [`GatewayOrderStatus::new`].
    pub payment_details: Vec<PaymentAttempt>,
}

impl GatewayOrderStatus {
    /// Orders attempts newest first; attempts without a timestamp go last.
    #[must_use]
    pub fn new(state: GatewayState, mut payment_details: Vec<PaymentAttempt>) -> Self {
        payment_details.sort_by_key(|attempt| Reverse(attempt.timestamp));

        Self {
            state,
            payment_details,
        }
    }
}
