//! Top-K selection and per-candidate assessments.

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use doc_extract::{DocumentReader, ExtractError, truncate_chars};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    llm::AssessmentProvider,
    prompt::{bound_output, build_assessment_prompt},
    rank::RankedEntry,
};

/// The first `min(k, len)` entries in ranking order.
pub fn top_k(ranking: &[RankedEntry], k: usize) -> &[RankedEntry] {
    &ranking[..k.min(ranking.len())]
}

/// Narrative for one top-K candidate. Exactly one of `analysis` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateAssessment {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateAssessment {
    fn ok(file_name: String, analysis: String) -> Self {
        Self {
            file_name,
            analysis: Some(analysis),
            error: None,
        }
    }

    fn failed(file_name: String, error: impl ToString) -> Self {
        Self {
            file_name,
            analysis: None,
            error: Some(error.to_string()),
        }
    }
}

/// Size and concurrency limits for assessments.
#[derive(Debug, Clone, Copy)]
pub struct AssessLimits {
    pub max_input_chars: usize,
    pub max_output_chars: usize,
    pub concurrency: usize,
}

/// Assesses every candidate in `top`, preserving its order.
///
/// Each candidate's text is read again from its document, independent of the
/// embedding cache. A failure affects only that candidate's entry.
pub async fn assess_candidates(
    query: &str,
    top: &[RankedEntry],
    paths: &BTreeMap<String, PathBuf>,
    reader: Arc<dyn DocumentReader>,
    assessor: &dyn AssessmentProvider,
    limits: AssessLimits,
) -> Vec<CandidateAssessment> {
    let futures: Vec<_> = top
        .iter()
        .map(|entry| {
            let reader = Arc::clone(&reader);
            let path = paths.get(&entry.identity).cloned();
            async move {
                let Some(path) = path else {
                    return CandidateAssessment::failed(
                        entry.identity.clone(),
                        "document is no longer available",
                    );
                };
                assess_one(query, &entry.identity, path, reader, assessor, limits).await
            }
        })
        .collect();
    stream::iter(futures)
        .buffered(limits.concurrency.max(1))
        .collect()
        .await
}

async fn assess_one(
    query: &str,
    identity: &str,
    path: PathBuf,
    reader: Arc<dyn DocumentReader>,
    assessor: &dyn AssessmentProvider,
    limits: AssessLimits,
) -> CandidateAssessment {
    let read_path = path.clone();
    let text = match tokio::task::spawn_blocking(move || reader.read_text(&read_path)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(identity, error = %e, "cannot read candidate for assessment");
            return CandidateAssessment::failed(identity.to_string(), e);
        }
        Err(join) => {
            let e = ExtractError::Unreadable {
                path,
                attempts: vec![format!("extraction task failed: {join}")],
            };
            return CandidateAssessment::failed(identity.to_string(), e);
        }
    };

    let prompt = build_assessment_prompt(query, truncate_chars(&text, limits.max_input_chars));
    match assessor.assess(&prompt).await {
        Ok(raw) => {
            debug!(identity, "candidate assessed");
            CandidateAssessment::ok(
                identity.to_string(),
                bound_output(&raw, limits.max_output_chars),
            )
        }
        Err(e) => {
            warn!(identity, error = %e, "assessment failed");
            CandidateAssessment::failed(identity.to_string(), e)
        }
    }
}
