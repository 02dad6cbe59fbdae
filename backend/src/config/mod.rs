//! Configuration management for the auth gateway
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: GATEWAY__)
//! 4. Plain `PORT`, `DATABASE_URL` and `JWT_SECRET` variables

use anyhow::Result;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: CredentialConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
///
/// Without a URL users are kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub token_expiry_secs: i64,
    pub leeway_secs: u64,
}

/// Where the credential is read from on incoming requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialCarrier {
    Body,
    Header,
    Cookie,
}

/// Credential extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    pub carrier: CredentialCarrier,
    pub body_field: String,
    pub cookie_name: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            carrier: CredentialCarrier::Body,
            body_field: "token".to_string(),
            cookie_name: "token".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: None,
                token_expiry_secs: 7200, // 2 hours
                leeway_secs: 60,
            },
            auth: CredentialConfig::default(),
        }
    }
}

/// Verification settings handed to the token service.
///
/// Built once at startup and never mutated. A missing secret is allowed
/// here: every verification then fails as an internal error instead of
/// aborting the process.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: Option<SecretString>,
    pub token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub fn new(secret: Option<&str>, token_expiry_secs: i64, leeway_secs: u64) -> Self {
        Self {
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| SecretString::new(s.to_string())),
            token_expiry_secs,
            leeway_secs,
        }
    }
}

impl From<&JwtConfig> for AuthConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self::new(jwt.secret.as_deref(), jwt.token_expiry_secs, jwt.leeway_secs)
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with GATEWAY__ prefix
    /// 4. `PORT`, `DATABASE_URL`, `JWT_SECRET`
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., GATEWAY__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("GATEWAY").separator("__"))
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::from(&self.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert!(config.database.url.is_none());
        assert!(config.jwt.secret.is_none());
        assert_eq!(config.auth.carrier, CredentialCarrier::Body);
        assert_eq!(config.auth.body_field, "token");
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }

    #[test]
    fn test_empty_secret_treated_as_absent() {
        let auth = AuthConfig::new(Some(""), 60, 0);
        assert!(auth.secret.is_none());

        let auth = AuthConfig::new(Some("s3cret"), 60, 0);
        assert_eq!(auth.secret.unwrap().expose_secret(), "s3cret");
    }

    #[test]
    fn test_carrier_deserializes_lowercase() {
        let carrier: CredentialCarrier = serde_json::from_str("\"cookie\"").unwrap();
        assert_eq!(carrier, CredentialCarrier::Cookie);
    }
}
