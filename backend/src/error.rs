//! Application error handling
//!
//! Every failure leaves the API as `{ "success": false, "message": ... }`
//! with a status that separates client faults (4xx) from server faults (5xx).

use crate::repositories::RepositoryError;
use auth_gateway_shared::{ApiMessage, AuthError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Auth(err) => {
                match err {
                    AuthError::InternalVerificationFailure | AuthError::MissingIdentity => {
                        error!(code = err.code(), "request rejected")
                    }
                    _ => warn!(code = err.code(), "request rejected"),
                }
                err.to_string()
            }
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "An internal error occurred".to_string()
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                "A database error occurred".to_string()
            }
        };

        (status, Json(ApiMessage::failure(message))).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::DuplicateEmail => ApiError::Conflict("User already exists".to_string()),
            RepositoryError::Database(err) => ApiError::Database(err),
            RepositoryError::InvalidRecord(msg) => ApiError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use auth_gateway_shared::Role;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_response() {
        let response = ApiError::from(AuthError::MissingCredential).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({ "success": false, "message": "Token missing" })
        );
    }

    #[tokio::test]
    async fn test_role_mismatch_response() {
        let response = ApiError::from(AuthError::RoleMismatch(Role::Admin)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_of(response).await["message"],
            "This is protected route for Admin"
        );
    }

    #[test]
    fn test_missing_identity_is_server_error() {
        let response = ApiError::from(AuthError::MissingIdentity).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_verification_failure_is_unauthorized() {
        let response = ApiError::from(AuthError::InternalVerificationFailure).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::Internal(anyhow::anyhow!("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["message"], "An internal error occurred");
    }

    #[test]
    fn test_conflict_error_status() {
        let response = ApiError::Conflict("User already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
