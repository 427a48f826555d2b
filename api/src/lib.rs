//! HTTP surface of the review bot.
//!
//! `/test` and `/webhook/gitlab`; the webhook hands review work to a
//! background worker and answers immediately.

pub mod core;
pub mod error_handler;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::signal;
use tracing::{info, warn};

use crate::core::{app_config::AppConfig, app_state::AppState};
use crate::error_handler::{AppError, AppResult};
use crate::routes::{
    gitlab_webhook::gitlab_webhook_route::{gitlab_webhook_probe, gitlab_webhook_route},
    test_route::test_route,
};

/// Router with all endpoints bound to `state`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/test", get(test_route).post(test_route))
        .route(
            "/webhook/gitlab",
            get(gitlab_webhook_probe).post(gitlab_webhook_route),
        )
        .with_state(state)
}

/// Loads configuration, serves until Ctrl+C/SIGTERM, then drains review tasks.
pub async fn start() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::new(&config)?);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(
        %addr,
        gitlab = %config.gitlab.api_base(),
        llm_provider = %config.llm.provider,
        llm_model = %config.llm.model,
        max_concurrency = config.max_concurrency,
        "review bot listening"
    );

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    state.worker.shutdown(state.shutdown_grace).await;
    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}
