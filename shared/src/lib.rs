//! Auth Gateway Shared Library
//!
//! Types shared between the gateway backend and its clients: roles,
//! the rejection taxonomy, request/response bodies and input validation.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::User;
pub use types::*;
