//! Auth error mapping.

use salvo::http::StatusError;
use tracing::error;

use elysian_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::AuthenticationRequired => {
            StatusError::unauthorized().brief("Authentication required")
        }
        AuthServiceError::Forbidden => {
            StatusError::forbidden().brief("You do not have permission to perform this action")
        }
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid mobile number or password")
        }
        AuthServiceError::NotFound => StatusError::not_found().brief("User not found"),
        AuthServiceError::AlreadyExists => {
            StatusError::conflict().brief("A user with this mobile number already exists")
        }
        AuthServiceError::InvalidData(reason) => StatusError::bad_request().brief(reason),
        AuthServiceError::Sql(source) => {
            error!("auth storage error: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::PasswordHash(source) => {
            error!("failed to hash password: {source}");

            StatusError::internal_server_error()
        }
    }
}
