//! Ollama backend implementation
//!
//! HTTP client for a local Ollama server. No credential is needed; the host
//! itself is what enables the backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{CompletionRequest, LlmError};
use super::LlmBackend;

#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, LlmError> {
        let body = OllamaRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), &text));
        }

        let ollama_response: OllamaResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::Upstream(format!("Malformed Ollama response: {}", e)))?;
        if let Some(error) = ollama_response.error {
            return Err(LlmError::Upstream(error));
        }
        if ollama_response.response.trim().is_empty() {
            return Err(LlmError::Upstream("Empty response from Ollama".into()));
        }

        debug!(model = %self.model, "Ollama response received");
        Ok(ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
