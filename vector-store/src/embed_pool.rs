//! Bounded-concurrency extraction + embedding of cache misses.

use std::sync::Arc;

use ai_llm_service::AiLlmError;
use doc_extract::{DocumentReader, ExtractError, truncate_chars};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::{document::Document, embed::EmbeddingsProvider};

/// Result of processing one document. Failures are per-document.
#[derive(Debug)]
pub enum EmbedOutcome {
    Embedded { identity: String, vector: Vec<f32> },
    Unreadable { identity: String, error: ExtractError },
    Failed { identity: String, error: AiLlmError },
}

/// Extracts, truncates to `max_chars` and embeds every document,
/// with at most `concurrency` documents in flight.
///
/// Extraction runs on the blocking pool. Output order is unspecified.
pub async fn embed_documents(
    docs: Vec<Document>,
    provider: &dyn EmbeddingsProvider,
    reader: Arc<dyn DocumentReader>,
    max_chars: usize,
    concurrency: usize,
) -> Vec<EmbedOutcome> {
    if docs.is_empty() {
        debug!("embed_pool::embed_documents: nothing to embed");
        return Vec::new();
    }
    info!(
        total = docs.len(),
        concurrency = concurrency.max(1),
        "embedding uncached documents"
    );

    stream::iter(docs)
        .map(|doc| {
            let reader = Arc::clone(&reader);
            async move { embed_one(doc, provider, reader, max_chars).await }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

async fn embed_one(
    doc: Document,
    provider: &dyn EmbeddingsProvider,
    reader: Arc<dyn DocumentReader>,
    max_chars: usize,
) -> EmbedOutcome {
    let path = doc.path.clone();
    let extracted = tokio::task::spawn_blocking(move || reader.read_text(&path))
        .await
        .unwrap_or_else(|join| {
            Err(ExtractError::Unreadable {
                path: doc.path.clone(),
                attempts: vec![format!("extraction task failed: {join}")],
            })
        });

    let text = match extracted {
        Ok(t) => t,
        Err(error) => {
            warn!(identity = %doc.identity, %error, "skipping unreadable document");
            return EmbedOutcome::Unreadable {
                identity: doc.identity,
                error,
            };
        }
    };

    match provider.embed(truncate_chars(&text, max_chars)).await {
        Ok(vector) => {
            debug!(identity = %doc.identity, dim = vector.len(), "document embedded");
            EmbedOutcome::Embedded {
                identity: doc.identity,
                vector,
            }
        }
        Err(error) => {
            warn!(identity = %doc.identity, %error, "embedding failed");
            EmbedOutcome::Failed {
                identity: doc.identity,
                error,
            }
        }
    }
}
