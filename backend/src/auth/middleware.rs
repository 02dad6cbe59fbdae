//! Authentication and authorization middleware
//!
//! Gated routes run two stages in order:
//!
//! 1. [`authenticate`]: locate the credential, verify it with the process
//!    secret and attach an [`Identity`] to the request extensions.
//! 2. [`authorize`]: compare the attached identity's role against the
//!    route's required role.
//!
//! Either stage ends the request with a structured rejection; the handler
//! only runs when both pass. The stage logic lives in
//! [`TokenAuthenticator`] and [`RoleAuthorizer`] so it can be exercised
//! without an HTTP stack.

use crate::auth::credential::CredentialSource;
use crate::auth::jwt::{Claims, JwtService};
use crate::error::ApiError;
use crate::state::AppState;
use auth_gateway_shared::{AuthError, Role};
use axum::{
    body::Body,
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Upper bound on a body buffered to look for a credential
const MAX_CREDENTIAL_BODY_BYTES: usize = 1024 * 1024;

/// Verified claims attached to a request (the request's `user` slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

/// Turns a raw credential into an [`Identity`]
#[derive(Clone)]
pub struct TokenAuthenticator {
    jwt: JwtService,
    source: Arc<dyn CredentialSource>,
}

impl TokenAuthenticator {
    pub fn new(jwt: JwtService, source: Arc<dyn CredentialSource>) -> Self {
        Self { jwt, source }
    }

    pub fn source(&self) -> &dyn CredentialSource {
        self.source.as_ref()
    }

    pub fn authenticate(&self, credential: Option<&str>) -> Result<Identity, AuthError> {
        let token = credential.ok_or(AuthError::MissingCredential)?;
        let claims = self.jwt.verify(token)?;

        debug!(sub = %claims.sub, role = %claims.role, exp = claims.exp, "token verified");

        Ok(Identity::new(claims))
    }
}

/// Admits requests whose identity carries exactly the required role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAuthorizer {
    required: Role,
}

impl RoleAuthorizer {
    pub fn new(required: Role) -> Self {
        Self { required }
    }

    pub fn required(&self) -> Role {
        self.required
    }

    pub fn authorize(&self, identity: Option<&Identity>) -> Result<(), AuthError> {
        let identity = identity.ok_or(AuthError::MissingIdentity)?;
        if identity.role() != self.required {
            return Err(AuthError::RoleMismatch(self.required));
        }
        Ok(())
    }
}

/// Authenticate stage.
///
/// Apply with `middleware::from_fn_with_state(state, authenticate)`. A body
/// read for the credential is handed on unchanged.
pub async fn authenticate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authenticator = state.authenticator();
    let (parts, body) = request.into_parts();

    let (credential, body) = if authenticator.source().reads_body() {
        match axum::body::to_bytes(body, MAX_CREDENTIAL_BODY_BYTES).await {
            Ok(bytes) => (
                authenticator.source().extract(&parts.headers, &bytes),
                Body::from(bytes),
            ),
            Err(e) => {
                warn!(error = %e, "request body unreadable while locating credential");
                (None, Body::empty())
            }
        }
    } else {
        (authenticator.source().extract(&parts.headers, &[]), body)
    };

    let identity = authenticator.authenticate(credential.as_deref())?;

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Authorize stage.
///
/// Apply with `middleware::from_fn_with_state(RoleAuthorizer::new(role), authorize)`,
/// always inside an [`authenticate`] layer.
pub async fn authorize(
    State(authorizer): State<RoleAuthorizer>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorizer.authorize(request.extensions().get::<Identity>())?;
    Ok(next.run(request).await)
}

/// Authenticated caller, read from the identity the authenticate stage attached.
///
/// Rejects with `MissingIdentity` (500) when the route was not wrapped in
/// [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(|identity| AuthUser(identity.into_claims()))
            .ok_or(ApiError::Auth(AuthError::MissingIdentity))
    }
}
