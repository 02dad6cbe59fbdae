//! JWT token generation and validation
//!
//! Tokens are HS256-signed with the single process secret from
//! [`AuthConfig`]. Keys are derived once at startup.

use crate::config::AuthConfig;
use auth_gateway_shared::{AuthError, Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Failure to mint a token
#[derive(Error, Debug)]
pub enum TokenIssueError {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service for token operations
///
/// Cheap to clone. `keys` is `None` when no secret was configured, in
/// which case issuing fails and every verification reports
/// [`AuthError::InternalVerificationFailure`].
#[derive(Clone)]
pub struct JwtService {
    keys: Option<JwtKeys>,
    validation: Arc<Validation>,
    token_expiry_secs: i64,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtService")
            .field("configured", &self.keys.is_some())
            .field("token_expiry_secs", &self.token_expiry_secs)
            .finish()
    }
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: config
                .secret
                .as_ref()
                .map(|secret| JwtKeys::new(secret.expose_secret())),
            validation: Arc::new(validation),
            token_expiry_secs: config.token_expiry_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// Issue a token for a stored user
    pub fn issue(&self, user: &User) -> Result<String, TokenIssueError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.token_expiry_secs)).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims with the process secret
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenIssueError> {
        let keys = self.keys.as_ref().ok_or(TokenIssueError::MissingSecret)?;
        Ok(encode(&Header::new(Algorithm::HS256), claims, keys.encoding())?)
    }

    /// Verify a credential and return its claims.
    ///
    /// Pure: the same token always yields the same claims (until it expires).
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let keys = self
            .keys
            .as_ref()
            .ok_or(AuthError::InternalVerificationFailure)?;

        decode::<Claims>(token, keys.decoding(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify(e.kind()))
    }

    /// Configured token lifetime in seconds
    #[inline]
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }
}

// Client-caused failures are invalid credentials; anything touching key
// material or the crypto backend is an internal failure.
fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => AuthError::InvalidCredential,
        _ => AuthError::InternalVerificationFailure,
    }
}
