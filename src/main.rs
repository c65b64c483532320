use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod handlers;
mod middleware;
mod models;
mod shortcode;
mod storage;

use storage::Storage;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: config::AppConfig,
    /// Backend chosen by `config.storage`; the only owner of stored records.
    pub storage: Arc<dyn Storage>,
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route(
            "/",
            post(handlers::shorten::shorten_text).get(handlers::redirect::missing_code),
        )
        .route("/api/shorten", post(handlers::shorten::shorten_json))
        // Liveness probe, no storage access
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        // Short-link redirect; static routes above take priority. Codes may
        // contain '/', so the whole remaining path is the code.
        .route("/*code", get(handlers::redirect::redirect))
        .with_state(state);

    middleware::apply(app)
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent; env vars may already be set)
    dotenvy::dotenv().ok();

    let config = config::AppConfig::load();

    // RUST_LOG wins over the configured level when present
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(config.log_level.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting shortener on {}", config.server_address);
    tracing::info!("Base URL: {}", config.base_url);
    tracing::info!("Storage: {:?}", config.storage);

    // A corrupt store must stop startup rather than be overwritten later
    let storage = storage::open_storage(&config).await.with_context(|| {
        format!(
            "failed to open storage at {}",
            config.file_storage_path.display()
        )
    })?;

    let state = Arc::new(AppState {
        config,
        storage: storage.clone(),
    });
    let app = router(state.clone());

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&state.config.server_address)
        .await
        .with_context(|| format!("failed to bind {}", state.config.server_address))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Final flush once in-flight requests are done
    storage.save().await.context("failed to save storage")?;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
