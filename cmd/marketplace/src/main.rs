//! # Marketplace Binary
//!
//! The entry point that assembles the application from its adapters.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::http::{middleware, router, AppState};
use auth_adapters::{Argon2PasswordHasher, JwtTokenIssuer};
use configs::{LogFormat, LogSettings, Settings};
use domains::TokenIssuer;
use secrecy::ExposeSecret;
use services::{AccountService, AdService};
use storage_adapters::SqliteStore;
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_tracing(&settings.log);

    // 1. Storage
    let store = Arc::new(
        SqliteStore::connect(&settings.database.url, settings.database.max_connections)
            .await
            .context("failed to open database")?,
    );
    store.migrate().await.context("failed to create schema")?;

    // 2. Auth: the signing secret is read once and shared for the process lifetime
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        chrono::Duration::seconds(settings.auth.token_ttl_secs),
    ));

    // 3. Services and routes
    let state = AppState {
        accounts: Arc::new(AccountService::new(store.clone(), hasher, tokens.clone())),
        ads: Arc::new(AdService::new(store, settings.listing.page_size)),
        tokens,
    };
    let app = middleware::with_standard_layers(router(state), settings.request_timeout());

    let listener = TcpListener::bind(&settings.http.address)
        .await
        .with_context(|| format!("failed to bind {}", settings.http.address))?;
    tracing::info!(address = %settings.http.address, env = %settings.env, "marketplace listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("marketplace stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    match log.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
