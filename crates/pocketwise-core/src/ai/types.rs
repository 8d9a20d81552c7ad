//! Backend-agnostic request and error types

use thiserror::Error;

/// A single prompt/completion exchange
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Optional system instruction sent ahead of the prompt
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 600,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

/// Classified failure of an outbound model call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Rejected credentials or a misconfigured endpoint (401/403)
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    /// Rate limited (429)
    #[error("LLM service busy: {0}")]
    ServiceBusy(String),

    /// Upstream down or unreachable (503, connection failure)
    #[error("LLM service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Any other failure, including malformed payloads
    #[error("LLM upstream error: {0}")]
    Upstream(String),
}

impl LlmError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = format!("HTTP {}: {}", status, truncate(body, 200));
        match status {
            429 => Self::ServiceBusy(detail),
            401 | 403 => Self::Configuration(detail),
            503 => Self::ServiceUnavailable(detail),
            _ => Self::Upstream(detail),
        }
    }

    /// Whether trying again later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceBusy(_) | Self::ServiceUnavailable(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServiceUnavailable(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status.as_u16(), "")
        } else {
            Self::Upstream(e.to_string())
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
