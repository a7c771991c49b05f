//! Payment gateway errors.

use thiserror::Error;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response or an unexpected body.
    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),

    /// The gateway did not answer in time.
    #[error("payment gateway timed out")]
    Timeout,
}
