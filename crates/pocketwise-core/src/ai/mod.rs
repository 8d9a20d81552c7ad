//! Pluggable LLM backend abstraction
//!
//! The advisory service only needs one operation from a model: turn a prompt
//! into text. Backends differ in wire format and credentials.
//!
//! # Architecture
//!
//! - `LlmBackend` trait: the completion interface every backend implements
//! - `LlmClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! if let Some(client) = LlmClient::from_config(&config.llm) {
//!     let text = client.complete(&CompletionRequest::new("Hello")).await?;
//! }
//! ```

mod mock;
mod ollama;
mod openai_compatible;
pub mod types;

pub use mock::{MockBackend, MockReply};
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{BackendKind, LlmConfig};

/// Trait defining the interface for all LLM backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a completion for the request
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, LlmError>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete LLM client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum LlmClient {
    /// OpenAI chat completions API, or any server speaking it
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama generate API
    Ollama(OllamaBackend),
    /// Scripted backend for tests and offline demos
    Mock(MockBackend),
}

impl LlmClient {
    /// Create a client from resolved configuration
    ///
    /// Returns None when the selected backend is missing its credential
    /// (OpenAI: API key, Ollama: host) or when the backend is `none`.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        let client = match config.backend {
            BackendKind::OpenAI => {
                let api_key = config.openai.api_key.as_deref()?;
                LlmClient::OpenAICompatible(OpenAICompatibleBackend::with_api_key(
                    &config.openai.host,
                    &config.openai.model,
                    api_key,
                ))
            }
            BackendKind::Ollama => {
                let host = config.ollama.host.as_deref()?;
                LlmClient::Ollama(OllamaBackend::new(host, &config.ollama.model))
            }
            BackendKind::Mock => LlmClient::Mock(MockBackend::new()),
            BackendKind::None => return None,
        };

        debug!(
            model = client.model(),
            host = client.host(),
            "LLM client configured"
        );
        Some(client)
    }
}

// Implement LlmBackend for LlmClient by delegating to the inner backend
#[async_trait]
impl LlmBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, LlmError> {
        match self {
            LlmClient::OpenAICompatible(b) => b.complete(request).await,
            LlmClient::Ollama(b) => b.complete(request).await,
            LlmClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            LlmClient::OpenAICompatible(b) => b.health_check().await,
            LlmClient::Ollama(b) => b.health_check().await,
            LlmClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            LlmClient::OpenAICompatible(b) => b.model(),
            LlmClient::Ollama(b) => b.model(),
            LlmClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            LlmClient::OpenAICompatible(b) => b.host(),
            LlmClient::Ollama(b) => b.host(),
            LlmClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_api_key() {
        let config = LlmConfig::default();
        assert!(LlmClient::from_config(&config).is_none());

        let mut config = LlmConfig::default();
        config.openai.api_key = Some("sk-test".to_string());
        let client = LlmClient::from_config(&config).unwrap();
        assert!(matches!(client, LlmClient::OpenAICompatible(_)));
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.host(), "https://api.openai.com");
    }

    #[test]
    fn test_from_config_ollama_requires_host() {
        let mut config = LlmConfig {
            backend: BackendKind::Ollama,
            ..Default::default()
        };
        assert!(LlmClient::from_config(&config).is_none());

        config.ollama.host = Some("http://localhost:11434/".to_string());
        let client = LlmClient::from_config(&config).unwrap();
        assert!(matches!(client, LlmClient::Ollama(_)));
        assert_eq!(client.host(), "http://localhost:11434");
        assert_eq!(client.model(), "llama3.2");
    }

    #[test]
    fn test_from_config_none_and_mock() {
        let mut config = LlmConfig {
            backend: BackendKind::None,
            ..Default::default()
        };
        config.openai.api_key = Some("sk-test".to_string());
        assert!(LlmClient::from_config(&config).is_none());

        config.backend = BackendKind::Mock;
        assert!(matches!(
            LlmClient::from_config(&config),
            Some(LlmClient::Mock(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_client_delegates() {
        let client = LlmClient::Mock(MockBackend::new());
        assert!(client.health_check().await);
        let text = client
            .complete(&CompletionRequest::new("anything"))
            .await
            .unwrap();
        assert!(text.contains("INSIGHTS:"));
    }
}
