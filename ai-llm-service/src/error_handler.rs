//! Unified error handling for `ai-llm-service`.
//!
//! A single top-level [`AiLlmError`] groups configuration, provider and health
//! failures. Provider failures carry a [`ProviderErrorKind`] so callers can tell
//! a timeout from a rate limit or a malformed response without string matching.
//!
//! All messages carry the `[AI LLM Service]` tag to simplify attribution in logs.

use std::{fmt, str::FromStr, time::Duration};

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup only).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Any failure while talking to an embedding or chat provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Health-check/connectivity/decoding errors.
    #[error(transparent)]
    Health(#[from] HealthError),
}

impl AiLlmError {
    /// Returns the provider error kind when this is a provider failure.
    pub fn provider_kind(&self) -> Option<&ProviderErrorKind> {
        match self {
            AiLlmError::Provider(p) => Some(&p.kind),
            _ => None,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g. invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-2xx response details, with a trimmed body snippet.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    pub snippet: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// What went wrong in a provider call.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// Upstream answered with a non-success status (other than 429).
    #[error("{0}")]
    HttpStatus(HttpError),

    /// Upstream answered 429.
    #[error("rate limited: {0}")]
    RateLimited(HttpError),

    /// Connection, TLS or body transfer failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request exceeded the configured client timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Chat completion returned no usable content.
    #[error("empty choices in completion response")]
    EmptyChoices,

    /// Embedding length differs from the configured dimensionality.
    #[error("embedding dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    /// Provider requires an API key but none was configured.
    #[error("missing API key")]
    MissingApiKey,

    /// Endpoint is empty or not http(s).
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Config was routed to a client of another provider.
    #[error("invalid provider for this client")]
    InvalidProvider,
}

/// Provider failure tagged with the backend that produced it.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider:?}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }

    /// Maps a `reqwest` failure, keeping timeouts distinguishable.
    pub fn from_reqwest(provider: LlmProvider, err: &reqwest::Error, timeout: Duration) -> Self {
        let kind = if err.is_timeout() {
            ProviderErrorKind::Timeout(timeout)
        } else if err.is_decode() {
            ProviderErrorKind::Decode(err.to_string())
        } else {
            ProviderErrorKind::Transport(err.to_string())
        };
        Self::new(provider, kind)
    }

    /// Maps a non-success response into `RateLimited` or `HttpStatus`.
    pub fn from_status(provider: LlmProvider, status: StatusCode, url: &str, body: &str) -> Self {
        let http = HttpError {
            status,
            url: url.to_string(),
            snippet: make_snippet(body),
        };
        let kind = if status == StatusCode::TOO_MANY_REQUESTS {
            ProviderErrorKind::RateLimited(http)
        } else {
            ProviderErrorKind::HttpStatus(http)
        };
        Self::new(provider, kind)
    }
}

/* ------------------------------------------------------------------------- */
/* Health errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for provider health probes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("[AI LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("[AI LLM Service] {0}")]
    HttpStatus(HttpError),

    #[error("[AI LLM Service] health transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),
}

/// Trims a response body to a single-line snippet of at most 240 chars.
pub fn make_snippet(body: &str) -> String {
    let flat: String = body
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let trimmed = flat.trim();
    if trimmed.chars().count() <= 240 {
        trimmed.to_string()
    } else {
        let mut s: String = trimmed.chars().take(240).collect();
        s.push('…');
        s
    }
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Fetches a required, non-empty environment variable.
pub fn must_env(name: &'static str) -> Result<String> {
    non_empty_var(name).ok_or_else(|| ConfigError::MissingVar(name).into())
}

/// Reads an optional variable, falling back to `default` when unset or empty.
pub fn env_or(name: &str, default: &str) -> String {
    non_empty_var(name).unwrap_or_else(|| default.to_string())
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match non_empty_var(name) {
        Some(v) => parse_value::<u32>(name, &v, "expected u32").map(Some),
        None => Ok(None),
    }
}

/// Parses a variable into `T`, falling back to `default` when unset or empty.
pub fn env_parse<T: FromStr>(name: &'static str, default: T, reason: &'static str) -> Result<T> {
    match non_empty_var(name) {
        Some(v) => parse_value(name, &v, reason),
        None => Ok(default),
    }
}

/// Parses a raw value, mapping failures to [`ConfigError::InvalidNumber`].
pub fn parse_value<T: FromStr>(var: &'static str, raw: &str, reason: &'static str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber { var, reason }.into())
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}
