//! HTTP service
//!
//! Exposes the scrub engine over `axum`:
//! - `POST /scrub` returns the redacted transcript
//! - `POST /analyze` returns the detections without redacting
//! - `GET /health` reports liveness and the loaded languages
//!
//! Every request except `/health` must carry the configured key in the
//! `x-api-key` header.

pub mod auth;
pub mod errors;
pub mod handlers;

pub use errors::{ApiError, ApiResult};

use crate::anonymization::ScrubEngine;
use crate::config::{ScrubberConfig, SecretString};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Shared state of the request handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScrubEngine>,
    pub api_key: Arc<SecretString>,
    pub timeout: Duration,
}

impl AppState {
    pub fn new(engine: Arc<ScrubEngine>, api_key: SecretString, timeout: Duration) -> Self {
        Self {
            engine,
            api_key: Arc::new(api_key),
            timeout,
        }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/scrub", post(handlers::scrub))
        .route("/analyze", post(handlers::analyze))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Build the engine from configuration and serve until SIGINT or SIGTERM
///
/// # Errors
///
/// Fails before binding when no API key is configured or the engine cannot
/// be built, and afterwards if the listener fails.
pub async fn serve(config: &ScrubberConfig) -> anyhow::Result<()> {
    let api_key = config
        .server
        .api_key
        .clone()
        .filter(|key| !key.expose_secret().is_empty())
        .context("server.api_key is not configured (set SCRUB_API_KEY)")?;

    let engine = ScrubEngine::from_config(config).context("Failed to build scrub engine")?;
    let state = AppState::new(
        Arc::new(engine),
        api_key,
        Duration::from_millis(config.analyzer.timeout_ms),
    );

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    serve_on(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    tracing::info!(address = %address, "Scrubber service listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    tracing::info!("Scrubber service stopped");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                    }
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                    }
                }
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_requires_api_key() {
        let config = ScrubberConfig::default();
        let err = serve(&config).await.unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[tokio::test]
    async fn test_serve_rejects_blank_api_key() {
        let mut config = ScrubberConfig::default();
        config.server.api_key = Some(crate::config::secret_string("   ".to_string()));
        assert!(serve(&config).await.is_err());
    }
}
