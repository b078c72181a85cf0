//! Assessment provider seam and its LLM-backed implementation.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::{AiLlmError, LlmServiceProfiles};

pub type AssessFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// Produces a short narrative for a fully built prompt.
pub trait AssessmentProvider: Send + Sync {
    fn assess<'a>(&'a self, prompt: &'a str) -> AssessFuture<'a>;
}

/// Sends prompts to the assessment profile of the shared LLM service.
#[derive(Clone)]
pub struct LlmAssessor {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmAssessor {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl AssessmentProvider for LlmAssessor {
    fn assess<'a>(&'a self, prompt: &'a str) -> AssessFuture<'a> {
        Box::pin(async move { self.svc.generate(prompt, None).await })
    }
}
