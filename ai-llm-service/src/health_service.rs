//! Health probes for the configured LLM backends.
//!
//! - Ollama: `GET {endpoint}/api/tags`, model must be listed
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth, model must be listed
//!
//! [`HealthService::check`] never fails; errors become `ok = false`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single profile.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Profile role (`assessment`, `embedding`).
    pub role: String,
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(role: &str, cfg: &LlmModelConfig, ok: bool, latency_ms: u128, msg: String) -> Self {
        Self {
            role: role.to_string(),
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: msg,
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthService {
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HealthError::from)?;
        Ok(Self { client, timeout })
    }

    /// Probes one profile. Never returns an error.
    pub async fn check(&self, role: &str, cfg: &LlmModelConfig) -> HealthStatus {
        if !cfg.has_http_endpoint() {
            warn!(role, endpoint = %cfg.endpoint, "invalid endpoint for health probe");
            return HealthStatus::new(
                role,
                cfg,
                false,
                0,
                "endpoint is empty or missing http/https".into(),
            );
        }

        let start = Instant::now();
        let probe = match cfg.provider {
            LlmProvider::Ollama => self.list_ollama_models(cfg).await,
            LlmProvider::OpenAI => self.list_openai_models(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        let status = match probe {
            Ok(models) if models.iter().any(|m| m == &cfg.model) => {
                HealthStatus::new(role, cfg, true, latency, "model is available".into())
            }
            Ok(_) => HealthStatus::new(
                role,
                cfg,
                false,
                latency,
                "provider is up, but model is not listed".into(),
            ),
            Err(e) => HealthStatus::new(role, cfg, false, latency, e.to_string()),
        };

        info!(
            role,
            provider = %status.provider,
            model = %status.model,
            ok = status.ok,
            latency_ms = status.latency_ms,
            "health probe completed"
        );
        status
    }

    async fn list_ollama_models(&self, cfg: &LlmModelConfig) -> Result<Vec<String>, HealthError> {
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            #[serde(default)]
            models: Vec<Tag>,
        }

        let url = format!("{}/api/tags", cfg.base_url());
        let tags: Tags = self.get_json(self.client.get(&url), &url).await?;
        // Ollama lists `name:tag`; accept a bare name as `name:latest`.
        Ok(tags
            .models
            .into_iter()
            .flat_map(|t| {
                let bare = t.name.strip_suffix(":latest").map(str::to_string);
                std::iter::once(t.name).chain(bare)
            })
            .collect())
    }

    async fn list_openai_models(&self, cfg: &LlmModelConfig) -> Result<Vec<String>, HealthError> {
        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Decode("missing OpenAI API key".into()))?;
        let url = format!("{}/v1/models", cfg.base_url());
        let req = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", key.trim()));
        let models: Models = self.get_json(req, &url).await?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    async fn get_json<T>(&self, req: reqwest::RequestBuilder, url: &str) -> Result<T, HealthError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!(timeout_secs = self.timeout.as_secs(), "GET {}", url);
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet: make_snippet(&text),
            }));
        }
        resp.json::<T>()
            .await
            .map_err(|e| HealthError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ollama(endpoint: &str, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            dimensions: None,
            timeout_secs: Some(2),
        }
    }

    #[tokio::test]
    async fn ollama_model_listed_is_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{"name": "nomic-embed-text:latest"}]
            })))
            .mount(&server)
            .await;

        let svc = HealthService::new(Some(2)).unwrap();
        let st = svc
            .check("embedding", &ollama(&server.uri(), "nomic-embed-text"))
            .await;
        assert!(st.ok, "{}", st.message);

        let st = svc.check("assessment", &ollama(&server.uri(), "llama3")).await;
        assert!(!st.ok);
    }

    #[tokio::test]
    async fn failures_never_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let svc = HealthService::new(Some(2)).unwrap();
        let st = svc.check("embedding", &ollama(&server.uri(), "m")).await;
        assert!(!st.ok);
        assert!(st.message.contains("503"));

        let st = svc.check("embedding", &ollama("not-a-url", "m")).await;
        assert!(!st.ok);
    }
}
