use crate::config::llm_provider::LlmProvider;

/// Configuration for one model role (assessment or embedding).
///
/// # Fields
///
/// - `provider`: backend that serves the model.
/// - `model`: model identifier (e.g. `"text-embedding-3-large"`, `"gpt-4o-mini"`).
/// - `endpoint`: base URL without the API path (e.g. `https://api.openai.com`).
/// - `api_key`: bearer token for providers that require one.
/// - `max_tokens`: generation cap, ignored by embedding calls.
/// - `temperature`: sampling temperature, ignored by embedding calls.
/// - `top_p`: nucleus sampling cutoff.
/// - `dimensions`: requested embedding size; OpenAI truncates server-side when set.
/// - `timeout_secs`: per-request timeout applied to the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub dimensions: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Endpoint with trailing slashes removed, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }

    /// Whether the endpoint uses an http(s) scheme.
    pub fn has_http_endpoint(&self) -> bool {
        let e = self.endpoint.trim();
        e.starts_with("http://") || e.starts_with("https://")
    }
}
