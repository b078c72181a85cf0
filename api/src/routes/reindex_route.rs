//! POST /reindex — forces a reconciliation pass over the document folder.

use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;
use vector_store::ReconcileReport;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct ReindexResponse {
    pub documents: usize,
    pub ranked: usize,
    pub report: ReconcileReport,
}

/// Handler: POST /reindex
pub async fn reindex(
    State(state): State<Arc<AppState>>,
) -> AppResult<ApiResponse<ReindexResponse>> {
    let corpus = state.matcher.refresh().await?;
    Ok(ApiResponse::success(ReindexResponse {
        documents: corpus.documents.len(),
        ranked: corpus.vectors.len(),
        report: corpus.report.clone(),
    }))
}
