//! Address request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use elysian_app::domain::addresses::models::{Address, AddressUpdate, NewAddress};

/// Address
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub is_default: bool,

    /// RFC 3339.
    pub created_at: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id.into_i64(),
            name: address.name,
            address: address.address,
            city: address.city,
            state: address.state,
            pincode: address.pincode,
            country: address.country,
            is_default: address.is_default,
            created_at: address.created_at.to_string(),
        }
    }
}

/// Address List
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressesResponse {
    pub addresses: Vec<AddressResponse>,
}

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAddressRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateAddressRequest> for NewAddress {
    fn from(request: CreateAddressRequest) -> Self {
        NewAddress {
            name: request.name,
            address: request.address,
            city: request.city,
            state: request.state,
            pincode: request.pincode,
            country: request.country,
            is_default: request.is_default,
        }
    }
}

/// Update Address Request
///
/// Omitted fields keep their stored values.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateAddressRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

impl From<UpdateAddressRequest> for AddressUpdate {
    fn from(request: UpdateAddressRequest) -> Self {
        AddressUpdate {
            name: request.name,
            address: request.address,
            city: request.city,
            state: request.state,
            pincode: request.pincode,
            country: request.country,
            is_default: request.is_default,
        }
    }
}

/// Address created or updated
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressSavedResponse {
    pub message: String,
    pub address: AddressResponse,
}

/// Message-only response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}
