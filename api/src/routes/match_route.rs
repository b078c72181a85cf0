//! POST /match — ranks the document folder against a job description.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use matcher::{MatchRequest, MatchResponse};
use tracing::info;

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Handler: POST /match
///
/// Returns the bare match result (no envelope) so existing clients keep
/// reading `ranked_candidates` / `shown_top` / `analysis` at the top level.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/match \
///   -H 'content-type: application/json' \
///   -d '{"description":"Senior Rust engineer, async, Postgres","num_candidates":3}'
/// ```
pub async fn match_candidates(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MatchRequest>, JsonRejection>,
) -> AppResult<Json<MatchResponse>> {
    let Json(req) = body?;
    let resp = state.matcher.match_query(&req).await?;
    info!(
        ranked = resp.ranked_candidates.len(),
        shown_top = resp.shown_top,
        "match served"
    );
    Ok(Json(resp))
}
