//! Payment gateway integration.

pub mod errors;
pub mod gateway;
pub mod http;
pub mod models;

pub use errors::GatewayError;
pub use gateway::*;
pub use http::{HttpPaymentGateway, HttpPaymentGatewayConfig};
pub use models::*;
