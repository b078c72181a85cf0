//! Embedding gateway over the shared LLM service.

use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, ProviderError, ProviderErrorKind};
use tracing::warn;

use crate::embed::{EmbedFuture, EmbeddingsProvider, normalize_newlines};

/// Normalizes input text, calls the embedding profile and checks the
/// returned dimensionality.
#[derive(Clone)]
pub struct EmbeddingGateway {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl EmbeddingGateway {
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for EmbeddingGateway {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            let input = normalize_newlines(text);
            let vector = self.svc.embed(&input).await?;

            if vector.len() != self.dim {
                let provider = self.svc.profiles().1.provider;
                warn!(
                    got = vector.len(),
                    want = self.dim,
                    "embedding provider returned unexpected dimensionality"
                );
                return Err(ProviderError::new(
                    provider,
                    ProviderErrorKind::DimensionMismatch {
                        got: vector.len(),
                        want: self.dim,
                    },
                )
                .into());
            }
            Ok(vector)
        })
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
