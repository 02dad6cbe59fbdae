//! Application state management
//!
//! Shared, read-only after startup. Every field is cheap to clone.

use crate::auth::{credential, JwtService, TokenAuthenticator};
use crate::config::AppConfig;
use crate::repositories::UserRepository;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token service built from the process secret
    pub jwt: JwtService,
    /// User store for signup and login
    pub users: Arc<dyn UserRepository>,
    authenticator: TokenAuthenticator,
}

impl AppState {
    /// Derives the JWT keys and credential carrier from `config`.
    /// Call once at startup.
    pub fn new(users: Arc<dyn UserRepository>, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.auth_config());
        let authenticator = TokenAuthenticator::new(jwt.clone(), credential::from_config(&config.auth));

        Self {
            config: Arc::new(config),
            jwt,
            users,
            authenticator,
        }
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn users(&self) -> &dyn UserRepository {
        self.users.as_ref()
    }

    #[inline]
    pub fn authenticator(&self) -> &TokenAuthenticator {
        &self.authenticator
    }
}
