//! Turning a cart into an order.

use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    domain::{
        carts::{models::CartLine, pricing::minor_unit_line},
        orders::{
            errors::OrdersServiceError,
            models::{OrderId, OrderLine, PaymentStatus},
        },
    },
    payments::{GatewayState, InitiatedPayment},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PricedOrder {
    pub items: Vec<OrderLine>,
    pub order_amount: i64,
}

/// Snapshot cart lines into order lines priced in minor units.
pub(crate) fn freeze_cart_lines(lines: Vec<CartLine>) -> Result<PricedOrder, OrdersServiceError> {
    let mut order_amount: i64 = 0;
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let priced = minor_unit_line(line.price, line.discount, line.quantity)
            .ok_or(OrdersServiceError::AmountOutOfRange)?;

        order_amount = order_amount
            .checked_add(priced.line_total)
            .ok_or(OrdersServiceError::AmountOutOfRange)?;

        items.push(OrderLine {
            product_id: line.product_id,
            variant_id: line.variant_id,
            quantity: line.quantity,
            unit_price: priced.unit_price,
            discount: priced.line_discount,
            line_total: priced.line_total,
            product_name: line.product_name,
            variant_size: line.variant_size,
            variant_type: line.variant_type,
        });
    }

    Ok(PricedOrder {
        items,
        order_amount,
    })
}

/// Merchant order id sent to the gateway. Unique per attempt.
pub(crate) fn new_gateway_order_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn callback_url(base: &str, order: OrderId) -> String {
    format!("{}/order/status/{order}", base.trim_end_matches('/'))
}

pub(crate) fn payment_status_for(state: &GatewayState) -> PaymentStatus {
    match state {
        GatewayState::Completed => PaymentStatus::Completed,
        GatewayState::Failed => PaymentStatus::Failed,
        GatewayState::Pending | GatewayState::Other(_) => PaymentStatus::Pending,
    }
}

pub(crate) fn initiated_payment_info(initiated: &InitiatedPayment, callback_url: &str) -> Value {
    json!({
        "redirect_url": initiated.redirect_url,
        "expire_at": initiated.expire_at,
        "callback_url": callback_url,
        "gateway_reference": initiated.gateway_reference,
    })
}
