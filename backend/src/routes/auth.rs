//! Credential issuance routes
//!
//! Signup stores a user with a role; login hands back the token the gated
//! routes verify.

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::services::UserService;
use crate::state::AppState;
use auth_gateway_shared::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// POST /api/v1/signup
async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let response = UserService::signup(state.users(), req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/login
async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = UserService::login(state.users(), state.jwt(), req).await?;
    Ok(Json(response))
}
