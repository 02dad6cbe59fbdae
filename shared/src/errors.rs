//! Error types for the authentication pipeline

use crate::types::Role;
use thiserror::Error;

/// Rejection reasons produced by the authenticate and authorize stages.
///
/// `Display` is the client-facing message. `code` is the stable,
/// machine-readable reason used in logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token missing")]
    MissingCredential,

    #[error("Token is invalid")]
    InvalidCredential,

    #[error("Something went wrong, while verifying the token")]
    InternalVerificationFailure,

    #[error("This is protected route for {0}")]
    RoleMismatch(Role),

    #[error("User role can not be verified, internal server error")]
    MissingIdentity,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MISSING_CREDENTIAL",
            AuthError::InvalidCredential => "INVALID_CREDENTIAL",
            AuthError::InternalVerificationFailure => "VERIFICATION_FAILED",
            AuthError::RoleMismatch(_) => "ROLE_MISMATCH",
            AuthError::MissingIdentity => "MISSING_IDENTITY",
        }
    }

    /// HTTP status for this rejection.
    ///
    /// Only a missing identity is a server fault: it means the authorize
    /// stage was wired without authentication in front of it.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingIdentity => 500,
            _ => 401,
        }
    }
}
