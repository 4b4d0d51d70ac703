//! Ollama completion client.
//!
//! Calls the non-streaming `/api/generate` endpoint of an Ollama-compatible
//! server and returns the `response` field of the reply.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::retry::RetryPolicy;
use crate::domain::models::ModelConfig;
use crate::domain::ports::{CompletionClient, CompletionError};

/// Configuration for the Ollama client.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server base URL, without the `/api/...` path.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry attempts for transient failures.
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for OllamaConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            initial_backoff_ms: config.initial_backoff_ms,
            max_backoff_ms: config.max_backoff_ms,
        }
    }
}

impl OllamaConfig {
    /// Create config pointing at a different server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Request body for `/api/generate`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from `/api/generate` (non-streaming).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Completion client for an Ollama server.
pub struct OllamaClient {
    http_client: Client,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl OllamaClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// Returns `CompletionError::Transport` if the HTTP client cannot be built.
    pub fn new(config: OllamaConfig) -> Result<Self, CompletionError> {
        info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            max_retries = config.max_retries,
            "initializing Ollama client"
        );

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_generate(&self, prompt: &str, model: &str) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(CompletionError::Backend {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        parsed.response.ok_or_else(|| {
            CompletionError::InvalidResponse("missing \"response\" field".to_string())
        })
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    fn client_id(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError> {
        let text = self
            .retry_policy
            .execute(move || self.send_generate(prompt, model))
            .await?;

        debug!(reply_len = text.len(), "completion received");
        Ok(text)
    }

    async fn health_check(&self) -> Result<bool, CompletionError> {
        let response = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        Ok(response.status().is_success())
    }
}
