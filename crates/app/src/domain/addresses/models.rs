//! Address Models

use jiff::Timestamp;

use crate::{auth::UserId, ids::TypedId};

/// Address Id
pub type AddressId = TypedId<Address>;

/// A delivery address owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,

    /// Label such as "Home" or "Work".
    pub name: String,

    /// Street address.
    pub address: String,

    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Address {
    /// Single-line form frozen onto orders.
    #[must_use]
    pub fn delivery_line(&self) -> String {
        format!(
            "{}, {}, {} - {}",
            self.address, self.city, self.state, self.pincode
        )
    }
}

/// New Address Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,

    /// Defaults to India when omitted.
    pub country: Option<String>,

    pub is_default: bool,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}
