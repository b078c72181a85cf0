//! GET / and GET /health.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

/// Handler: GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Resume–Job Matching API is running 🚀" }))
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` when every provider probe succeeded, `degraded` otherwise.
    pub status: &'static str,
    /// Documents with a usable vector in the in-memory corpus.
    pub corpus_size: usize,
    pub providers: Vec<HealthStatus>,
}

/// Handler: GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResponse<HealthReport> {
    let providers = state.llm.health_all().await;
    let status = if providers.iter().all(|p| p.ok) {
        "ok"
    } else {
        "degraded"
    };
    ApiResponse::success(HealthReport {
        status,
        corpus_size: state.matcher.corpus_size().await,
        providers,
    })
}
