//! Gated routes
//!
//! Every route here sits behind the authenticate stage; `/student` and
//! `/admin` add a role check inside it.

use crate::auth::{authenticate, authorize, AuthUser, RoleAuthorizer};
use crate::state::AppState;
use auth_gateway_shared::{ApiMessage, Role};
use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::debug;

pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/test", get(test_route))
        .route("/me", get(me))
        .merge(role_gated(
            Role::Student,
            Router::new().route("/student", get(student_route)),
        ))
        .merge(role_gated(
            Role::Admin,
            Router::new().route("/admin", get(admin_route)),
        ))
        // Outermost: authentication runs before any role check
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

/// Require `role` on every route in `routes`.
///
/// Only valid inside an authenticate layer; on its own every request
/// fails with a missing-identity 500.
pub fn role_gated(role: Role, routes: Router<AppState>) -> Router<AppState> {
    routes.route_layer(middleware::from_fn_with_state(
        RoleAuthorizer::new(role),
        authorize,
    ))
}

async fn test_route() -> Json<ApiMessage> {
    Json(ApiMessage::ok("Welcome to the protected route for TESTS"))
}

async fn student_route(AuthUser(claims): AuthUser) -> Json<ApiMessage> {
    debug!(sub = %claims.sub, "student route");
    Json(ApiMessage::ok("Welcome to the protected route for Students"))
}

async fn admin_route(AuthUser(claims): AuthUser) -> Json<ApiMessage> {
    debug!(sub = %claims.sub, "admin route");
    Json(ApiMessage::ok("Welcome to the protected route for Admin"))
}

/// GET /api/v1/me
async fn me(AuthUser(claims): AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "user": claims }))
}
