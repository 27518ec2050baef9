//! # Whiteboard Binary
//!
//! The entry point that assembles the application from configuration and
//! compile-time features.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState, GateOptions};
use auth_adapters::JwtIdentityVerifier;
use configs::{LogFormat, Settings};
use domains::{DocumentStore, SystemClock};
use secrecy::ExposeSecret;
use services::{AccessGate, BoardService};
use storage_adapters::MemoryDocumentStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(not(all(feature = "web-axum", feature = "auth-jwt")))]
compile_error!("the whiteboard binary needs the `web-axum` and `auth-jwt` features");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_tracing(&settings);

    // 1. Document store
    let store: Arc<dyn DocumentStore> = match &settings.store.data_path {
        Some(path) => open_file_store(path).await?,
        None => {
            info!("using in-memory document store");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // 2. Identity verification
    let verifier = Arc::new(JwtIdentityVerifier::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.issuer.as_deref(),
    ));
    let mut gate = AccessGate::new(verifier);
    if settings.auth.require_profile {
        gate = gate.with_profiles(store.clone());
    }

    // 3. Services and routes
    let boards = BoardService::new(store, Arc::new(SystemClock));
    let state = AppState::new(
        boards,
        gate,
        GateOptions {
            login_path: settings.auth.login_path.clone(),
            cookie_names: settings.auth.cookie_names.clone(),
        },
    );

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, require_profile = settings.auth.require_profile, "whiteboard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("whiteboard stopped");
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match settings.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[cfg(feature = "store-file")]
async fn open_file_store(path: &str) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store = storage_adapters::FileDocumentStore::open(path)
        .await
        .with_context(|| format!("failed to open document store at {path}"))?;
    info!(path, "using file-backed document store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "store-file"))]
async fn open_file_store(path: &str) -> anyhow::Result<Arc<dyn DocumentStore>> {
    warn!(path, "store-file feature disabled, falling back to in-memory store");
    Ok(Arc::new(MemoryDocumentStore::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
