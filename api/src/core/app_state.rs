use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use matcher::Matcher;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ranking pipeline over the document folder.
    pub matcher: Arc<Matcher>,
    /// LLM profiles, used here for health probes only.
    pub llm: Arc<LlmServiceProfiles>,
}

impl AppState {
    pub fn new(matcher: Arc<Matcher>, llm: Arc<LlmServiceProfiles>) -> Self {
        Self { matcher, llm }
    }
}
