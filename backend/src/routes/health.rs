//! Health check endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (user store reachable, secret configured)
//! - /health/live - Liveness probe

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub user_store: CheckStatus,
    pub signing_secret: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Readiness probe, 503 if any dependency is unhealthy
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let user_store = match state.users().ping().await {
        Ok(()) => CheckStatus::healthy(),
        Err(e) => CheckStatus::unhealthy(e.to_string()),
    };

    let signing_secret = if state.jwt().is_configured() {
        CheckStatus::healthy()
    } else {
        CheckStatus::unhealthy("signing secret is not configured")
    };

    let is_healthy = user_store.is_healthy() && signing_secret.is_healthy();

    let response = HealthResponse {
        status: if is_healthy { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks {
            user_store,
            signing_secret,
        }),
    };

    if is_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe, always OK while the server runs
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::repositories::InMemoryUserRepository;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }

    #[tokio::test]
    async fn test_readiness_requires_secret() {
        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), AppConfig::default());
        match readiness_check(State(state)).await {
            Err((status, body)) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body.status, "not_ready");
            }
            Ok(_) => panic!("readiness should fail without a signing secret"),
        }

        let mut config = AppConfig::default();
        config.jwt.secret = Some("ready-secret".to_string());
        let state = AppState::new(Arc::new(InMemoryUserRepository::new()), config);
        let result = readiness_check(State(state)).await;
        assert!(result.is_ok());
    }
}
