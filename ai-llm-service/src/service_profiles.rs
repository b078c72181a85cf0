//! Shared LLM service with two profiles: `assessment` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - HTTP clients are built at construction, so a bad config fails at startup
//!   instead of on the first request.

use crate::{
    config::{default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

enum Client {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl Client {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Client::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => Client::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }
}

/// Manages the **assessment** and **embedding** profiles.
pub struct LlmServiceProfiles {
    assessment: LlmModelConfig,
    embedding: LlmModelConfig,
    assessment_client: Client,
    embedding_client: Client,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service from explicit profiles.
    pub fn new(
        assessment: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            assessment_client: Client::build(&assessment)?,
            embedding_client: Client::build(&embedding)?,
            assessment,
            embedding,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Creates the service from environment variables
    /// (see [`default_config`] for the variable list).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(
            default_config::config_assessment()?,
            default_config::config_embedding()?,
            Some(10),
        )
    }

    /// Generates text with the **assessment** profile.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.assessment_client {
            Client::Ollama(cli) => cli.generate(prompt).await,
            Client::OpenAI(cli) => cli.generate(prompt, system).await,
        }
    }

    /// Computes one embedding with the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding_client {
            Client::Ollama(cli) => cli.embeddings(input).await,
            Client::OpenAI(cli) => cli.embeddings(input).await,
        }
    }

    /// Health snapshot for both profiles. Identical profiles are probed once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut out = vec![self.health.check("assessment", &self.assessment).await];
        if self.embedding.endpoint != self.assessment.endpoint
            || self.embedding.model != self.assessment.model
        {
            out.push(self.health.check("embedding", &self.embedding).await);
        }
        out
    }

    /// Returns `(assessment, embedding)` profiles.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.assessment, &self.embedding)
    }
}
