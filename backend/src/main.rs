//! Auth Gateway
//!
//! Issues role-carrying bearer tokens and gates routes by role.
//!
//! ## Architecture
//!
//! - Routes: signup/login, gated demo routes, health probes
//! - Auth: token verification, authenticate/authorize middleware
//! - Repositories: user store (Postgres or in-memory)

use anyhow::Result;
use auth_gateway_backend::{
    config, db,
    repositories::{InMemoryUserRepository, PgUserRepository, UserRepository},
    routes,
    state::AppState,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        carrier = ?config.auth.carrier,
        "Starting auth gateway"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    if config.jwt.secret.as_deref().map_or(true, str::is_empty) {
        warn!("JWT secret is not configured; every gated request will be rejected");
    }

    let users = connect_user_store(&config).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(users, config);
    let app = routes::create_router(state);

    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Postgres when a database URL is configured, otherwise in-memory.
/// A configured database that cannot be reached aborts startup.
async fn connect_user_store(config: &config::AppConfig) -> Result<Arc<dyn UserRepository>> {
    match config.database.url.as_deref() {
        Some(url) => {
            info!("Connecting to database...");
            let pool = db::create_pool(url, config.database.max_connections)
                .await
                .map_err(|e| {
                    error!("Failed to connect to database: {:?}", e);
                    e
                })?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgUserRepository::new(pool)))
        }
        None => {
            warn!("No database configured; users are kept in memory");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "auth_gateway_backend=info,tower_http=info".into()
        } else {
            "auth_gateway_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    match config.jwt.secret.as_deref() {
        None | Some("") => errors.push("JWT secret must be set in production"),
        Some(secret) if secret.len() < 32 => {
            errors.push("JWT secret must be at least 32 characters")
        }
        _ => {}
    }

    if config.database.url.is_none() {
        errors.push("A database URL is required in production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
