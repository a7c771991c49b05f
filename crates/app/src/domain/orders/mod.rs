//! Orders

pub(crate) mod checkout;
pub mod errors;
pub mod models;
pub(crate) mod reconcile;
pub(crate) mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
