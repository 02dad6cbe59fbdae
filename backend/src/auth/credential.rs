//! Credential carriers
//!
//! A [`CredentialSource`] locates the raw token on an incoming request.
//! The authenticate middleware only sees this trait, so the carrier can be
//! swapped by configuration without touching verification.

use crate::config::{CredentialCarrier, CredentialConfig};
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use std::sync::Arc;

/// Deterministic token lookup: the same request always yields the same result.
pub trait CredentialSource: Send + Sync + 'static {
    /// Whether `extract` needs the buffered request body.
    fn reads_body(&self) -> bool {
        false
    }

    /// Returns the token, or `None` when the carrier holds nothing usable.
    /// An empty token counts as absent.
    fn extract(&self, headers: &HeaderMap, body: &[u8]) -> Option<String>;
}

/// Token in a top-level string field of a JSON body, e.g. `{"token": "..."}`
#[derive(Debug, Clone)]
pub struct BodyField {
    field: String,
}

impl BodyField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl CredentialSource for BodyField {
    fn reads_body(&self) -> bool {
        true
    }

    fn extract(&self, _headers: &HeaderMap, body: &[u8]) -> Option<String> {
        let json: serde_json::Value = serde_json::from_slice(body).ok()?;
        json.get(&self.field)?
            .as_str()
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

/// `Authorization: Bearer <token>`
#[derive(Debug, Clone, Default)]
pub struct BearerHeader;

impl CredentialSource for BearerHeader {
    fn extract(&self, headers: &HeaderMap, _body: &[u8]) -> Option<String> {
        headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string())
            .filter(|token| !token.is_empty())
    }
}

/// Named cookie
#[derive(Debug, Clone)]
pub struct CookieValue {
    name: String,
}

impl CookieValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CredentialSource for CookieValue {
    fn extract(&self, headers: &HeaderMap, _body: &[u8]) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    }
}

/// Build the configured carrier
pub fn from_config(config: &CredentialConfig) -> Arc<dyn CredentialSource> {
    match config.carrier {
        CredentialCarrier::Body => Arc::new(BodyField::new(config.body_field.clone())),
        CredentialCarrier::Header => Arc::new(BearerHeader),
        CredentialCarrier::Cookie => Arc::new(CookieValue::new(config.cookie_name.clone())),
    }
}
