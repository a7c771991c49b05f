//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::TokenError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// No acceptable credentials for the contract in force.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Authenticated, but not allowed.
    #[error("forbidden")]
    Forbidden,

    #[error("invalid mobile number or password")]
    InvalidCredentials,

    #[error("user not found")]
    NotFound,

    #[error("a user with this mobile number already exists")]
    AlreadyExists,

    #[error("{0}")]
    InvalidData(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] TokenError),

    #[error("password hashing error: {0}")]
    PasswordHash(argon2::password_hash::Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation) => Self::InvalidData("invalid user data"),
            Some(ErrorKind::NotNullViolation) => Self::InvalidData("missing required user data"),
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<TokenError> for AuthServiceError {
    fn from(error: TokenError) -> Self {
        Self::Token(error)
    }
}

impl From<argon2::password_hash::Error> for AuthServiceError {
    fn from(error: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(error)
    }
}
