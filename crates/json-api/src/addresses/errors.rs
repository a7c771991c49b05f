//! Errors

use salvo::http::StatusError;
use tracing::error;

use elysian_app::domain::addresses::AddressesServiceError;

pub(crate) fn into_status_error(error: AddressesServiceError) -> StatusError {
    match error {
        AddressesServiceError::NotFound => {
            StatusError::not_found().brief("Address not found or does not belong to user")
        }
        AddressesServiceError::InvalidData(reason) => StatusError::bad_request().brief(reason),
        AddressesServiceError::InvalidReference => {
            StatusError::bad_request().brief("Invalid address payload")
        }
        AddressesServiceError::Sql(source) => {
            error!("address storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
