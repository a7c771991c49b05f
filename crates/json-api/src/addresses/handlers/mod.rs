//! Address Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod update;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use elysian_app::{
        auth::UserId,
        domain::addresses::models::{Address, AddressId},
    };

    pub(super) fn make_address(id: i64, owner: UserId, is_default: bool) -> Address {
        Address {
            id: AddressId::from_i64(id),
            user_id: owner,
            name: "Home".to_string(),
            address: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            country: "India".to_string(),
            is_default,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
