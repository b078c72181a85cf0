//! Shared LLM access for the matching backend.
//!
//! The crate wraps two HTTP providers (OpenAI-compatible and Ollama) behind a
//! single [`service_profiles::LlmServiceProfiles`] value with two roles:
//!
//! - **assessment**: chat/generation model used for candidate narratives
//! - **embedding**: embedding model used for documents and queries
//!
//! Errors are unified under [`error_handler::AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
