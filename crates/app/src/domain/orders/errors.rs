//! Order service errors.

use sqlx::Error;
use thiserror::Error;

use crate::payments::GatewayError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("Address not found or does not belong to user")]
    AddressNotFound,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("order not found")]
    NotFound,

    #[error("order amount out of range")]
    AmountOutOfRange,

    #[error("Payment initiation failed")]
    PaymentInitiationFailed(#[source] GatewayError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        match error {
            Error::RowNotFound => Self::NotFound,
            error => Self::Sql(error),
        }
    }
}
