//! Authentication and anonymous sessions.

mod errors;
mod models;
mod password;
mod repository;
mod service;
mod tokens;

pub use errors::*;
pub use models::*;
pub use password::MIN_PASSWORD_LENGTH;
pub use service::*;
pub use tokens::*;
