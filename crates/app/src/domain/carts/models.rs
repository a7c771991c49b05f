//! Cart Models

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    auth::{Actor, SessionId, UserId},
    domain::catalog::models::{ProductId, VariantId},
    ids::TypedId,
};

/// Cart Id
pub type CartId = TypedId<Cart>;

/// Cart Item Id
pub type CartItemId = TypedId<CartLine>;

/// Whoever a cart belongs to. A cart never changes owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOwner {
    User(UserId),
    Session(SessionId),
}

impl From<Actor> for CartOwner {
    fn from(actor: Actor) -> Self {
        match actor {
            Actor::AuthenticatedUser(principal) => Self::User(principal.user_id),
            Actor::AnonymousSession(session) => Self::Session(session),
        }
    }
}

/// Cart Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub owner: CartOwner,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Add, change or remove a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemUpsert {
    /// Optional cross-check against the variant's product.
    pub product_id: Option<ProductId>,

    pub variant_id: VariantId,

    /// `0` removes the line; positive values overwrite the stored quantity.
    pub quantity: i64,
}

/// A stored cart line joined with live catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub product_name: String,
    pub variant_id: VariantId,
    pub variant_size: String,
    pub variant_type: String,
    pub quantity: i32,

    /// Variant unit price in major units.
    pub price: Decimal,

    /// Product discount percent.
    pub discount: Decimal,
}

/// A cart line with display pricing applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCartLine {
    pub line: CartLine,
    pub discounted_price: Decimal,
    pub item_total: Decimal,
}

/// Priced contents of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub items: Vec<PricedCartLine>,

    /// Number of distinct lines.
    pub total_items: usize,

    pub total_amount: Decimal,
}

/// What an upsert did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// The line was created or its quantity overwritten.
    Saved,

    /// The line was deleted.
    Removed,

    /// A removal was requested for a line that was not in the cart.
    Absent,
}

/// Result of an upsert: the change plus the cart as it now stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    pub change: CartChange,
    pub cart: CartView,
}
