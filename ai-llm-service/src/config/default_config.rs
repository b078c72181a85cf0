//! Default LLM configs loaded from environment variables.
//!
//! Two roles are built, each for the provider selected by `LLM_KIND`:
//!
//! - **Assessment** → chat model that writes short candidate narratives
//! - **Embedding**  → embedding model for documents and queries
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`           = `openai` (default) or `ollama`
//! - `LLM_MAX_TOKENS`     = assessment max tokens (default 160)
//! - `LLM_TIMEOUT_SECS`   = per-request timeout (default 60)
//! - `ASSESS_TEMPERATURE` = assessment temperature (default 0.3)
//! - `EMBEDDING_DIM`      = expected embedding size (default 3072)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  (mandatory)
//! - `OPENAI_BASE_URL` (default `https://api.openai.com`)
//! - `EMBEDDING_MODEL` (default `text-embedding-3-large`)
//! - `ASSESS_MODEL`    (default `gpt-4o-mini`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `EMBEDDING_MODEL`, `ASSESS_MODEL` (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_or, env_parse, must_env, validate_http_endpoint,
        validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_ASSESS_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_DIM: usize = 3072;
pub const DEFAULT_ASSESS_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 160;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Reads `LLM_KIND`, defaulting to OpenAI.
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    Ok(env_or("LLM_KIND", "openai").parse::<LlmProvider>()?)
}

/// Expected embedding dimensionality (`EMBEDDING_DIM`).
pub fn embedding_dim_from_env() -> Result<usize, AiLlmError> {
    let dim = env_parse("EMBEDDING_DIM", DEFAULT_EMBEDDING_DIM, "expected usize")?;
    if dim == 0 {
        return Err(ConfigError::OutOfRange {
            field: "EMBEDDING_DIM",
            detail: "must be greater than zero",
        }
        .into());
    }
    Ok(dim)
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = must_env("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", url.trim())?;
        return Ok(url);
    }
    if let Ok(port) = must_env("OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
    validate_http_endpoint("OPENAI_BASE_URL", url.trim())?;
    Ok(url)
}

fn timeout_from_env() -> Result<u64, AiLlmError> {
    env_parse("LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS, "expected u64 seconds")
}

/// Config for the **assessment** model.
///
/// # Defaults
/// - `temperature = 0.3`
/// - `max_tokens = 160`
pub fn config_assessment() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let temperature = env_parse(
        "ASSESS_TEMPERATURE",
        DEFAULT_ASSESS_TEMPERATURE,
        "expected f32",
    )?;
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let timeout_secs = Some(timeout_from_env()?);

    let (endpoint, model, api_key) = match provider {
        LlmProvider::OpenAI => (
            openai_endpoint()?,
            env_or("ASSESS_MODEL", DEFAULT_ASSESS_MODEL),
            Some(must_env("OPENAI_API_KEY")?),
        ),
        LlmProvider::Ollama => (ollama_endpoint()?, must_env("ASSESS_MODEL")?, None),
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        top_p: None,
        dimensions: None,
        timeout_secs,
    })
}

/// Config for the **embedding** model.
///
/// OpenAI requests carry `dimensions` only when `EMBEDDING_DIM` differs from
/// the native size of the default model, so older models keep working.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let dim = embedding_dim_from_env()?;
    let timeout_secs = Some(timeout_from_env()?);

    let (endpoint, model, api_key) = match provider {
        LlmProvider::OpenAI => (
            openai_endpoint()?,
            env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            Some(must_env("OPENAI_API_KEY")?),
        ),
        LlmProvider::Ollama => (ollama_endpoint()?, must_env("EMBEDDING_MODEL")?, None),
    };

    let dimensions = match provider {
        LlmProvider::OpenAI if dim != DEFAULT_EMBEDDING_DIM => Some(dim),
        _ => None,
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        dimensions,
        timeout_secs,
    })
}
