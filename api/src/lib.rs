//! HTTP surface of the matching service.
//!
//! - `POST /match`    rank the document folder against a job description
//! - `GET  /`         liveness message
//! - `GET  /health`   provider probes and corpus size
//! - `POST /reindex`  force a reconciliation pass
//! - `GET  /resumes/*` the documents themselves

use std::sync::Arc;

pub mod core;
pub mod error_handler;
pub mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;
use crate::routes::{
    health_route::{health, root},
    match_route::match_candidates,
    reindex_route::reindex,
};

/// Builds the router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let docs = ServeDir::new(&state.matcher.config().resume_dir);
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/match", post(match_candidates))
        .route("/reindex", post(reindex))
        .nest_service("/resumes", docs)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves on `addr` until Ctrl+C.
pub async fn start(state: AppState, addr: &str) -> Result<(), AppError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
