//! Cart request and response bodies.

use rust_decimal::{Decimal, prelude::ToPrimitive as _};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use elysian_app::domain::carts::models::{CartView, PricedCartLine};

/// Add, overwrite or remove a cart line.
///
/// Fields stay untyped so a malformed value is answered in the cart shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpsertCartItemRequest {
    /// Optional cross-check against the variant's product.
    #[salvo(schema(value_type = Option<i64>))]
    pub product_id: Option<Value>,

    #[salvo(schema(value_type = Option<i64>))]
    pub variant_id: Option<Value>,

    /// Defaults to 1. `0` removes the line.
    #[salvo(schema(value_type = Option<i64>))]
    pub quantity: Option<Value>,
}

/// Cart Item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub cart_item_id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub variant_id: i64,
    pub variant_size: String,
    pub variant_type: String,
    pub quantity: i32,
    pub price: f64,

    /// Discount percent.
    pub discount: f64,

    pub discounted_price: f64,
    pub item_total: f64,
}

impl From<PricedCartLine> for CartItemResponse {
    fn from(priced: PricedCartLine) -> Self {
        let line = priced.line;

        Self {
            cart_item_id: line.id.into_i64(),
            cart_id: line.cart_id.into_i64(),
            product_id: line.product_id.into_i64(),
            product_name: line.product_name,
            variant_id: line.variant_id.into_i64(),
            variant_size: line.variant_size,
            variant_type: line.variant_type,
            quantity: line.quantity,
            price: money(line.price),
            discount: money(line.discount),
            discounted_price: money(priced.discounted_price),
            item_total: money(priced.item_total),
        }
    }
}

/// The one shape every cart endpoint answers with, success or rejection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub cart_items: Vec<CartItemResponse>,
    pub total_items: usize,
    pub total_amount: f64,
}

impl CartResponse {
    pub(crate) fn new(cart: CartView, message: Option<String>) -> Self {
        Self {
            message,
            cart_items: cart.items.into_iter().map(Into::into).collect(),
            total_items: cart.total_items,
            total_amount: money(cart.total_amount),
        }
    }

    /// Empty cart carrying only the reason for rejection.
    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::new(CartView::default(), Some(message.into()))
    }
}

pub(crate) fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
