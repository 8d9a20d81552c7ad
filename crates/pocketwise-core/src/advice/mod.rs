//! Advisory service
//!
//! Produces advice for a category summary. When a model is configured the
//! summary is rendered into a prompt and sent through the [`LlmBackend`]; the
//! reply is split into insight and recommendation lists. Any model failure is
//! absorbed into the rule-based [`heuristic`] result, so the only error a
//! caller sees is [`Error::Cancelled`].
//!
//! The service has no timeout of its own. Callers bound the request by passing
//! a cancellation future, typically `tokio::time::sleep(limit)`.

pub mod heuristic;
pub mod parsing;
pub mod prompt;

use std::future::Future;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::ai::{CompletionRequest, LlmBackend, LlmClient, LlmError};
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::models::{AdviceRequest, AdviceResponse, AdviceSource, CategorySummary};

pub use heuristic::HeuristicAdvice;
pub use parsing::{parse_sections, ParsedSections};

/// Sampling settings sent with every completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        let defaults = LlmConfig::default();
        Self {
            system_prompt: defaults.system_prompt,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }
}

impl From<&LlmConfig> for CompletionSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Clone)]
pub struct AdvisoryService {
    client: Option<LlmClient>,
    settings: CompletionSettings,
}

impl AdvisoryService {
    /// Service backed by `client`, or heuristic-only when `None`
    pub fn new(client: Option<LlmClient>) -> Self {
        Self {
            client,
            settings: CompletionSettings::default(),
        }
    }

    /// Build the client and sampling settings from configuration
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = LlmClient::from_config(config);
        if client.is_none() {
            info!("No LLM configured, advice will use the heuristic generator");
        }
        Self {
            client,
            settings: CompletionSettings::from(config),
        }
    }

    pub fn with_settings(mut self, settings: CompletionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn is_llm_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&LlmClient> {
        self.client.as_ref()
    }

    /// Generate advice, racing the model call against `cancel`
    ///
    /// Returns `Error::Cancelled` if `cancel` completes first; the outbound
    /// request is dropped and no fallback is computed.
    pub async fn get_financial_advice<C>(
        &self,
        summary: &CategorySummary,
        request: &AdviceRequest,
        cancel: C,
    ) -> Result<AdviceResponse>
    where
        C: Future<Output = ()>,
    {
        let Some(client) = &self.client else {
            debug!("Using heuristic advice, no LLM configured");
            return Ok(heuristic_response(summary));
        };

        let completion = CompletionRequest::new(prompt::build_prompt(summary, request))
            .with_system(self.settings.system_prompt.clone())
            .with_sampling(self.settings.temperature, self.settings.max_tokens);

        let outcome = tokio::select! {
            biased;
            () = cancel => {
                warn!(model = client.model(), "Advice request cancelled before the model replied");
                return Err(Error::Cancelled);
            }
            result = client.complete(&completion) => result,
        };

        match outcome {
            Ok(text) => Ok(model_response(summary, text)),
            Err(e) => {
                log_llm_failure(&e, client);
                Ok(heuristic_response(summary))
            }
        }
    }
}

fn heuristic_response(summary: &CategorySummary) -> AdviceResponse {
    let advice = heuristic::generate(summary);
    AdviceResponse {
        advice: advice.advice,
        insights: advice.insights,
        recommendations: advice.recommendations,
        timestamp: Utc::now(),
        source: AdviceSource::Heuristic,
    }
}

/// Parse the reply and fill any empty list from the heuristic generator
fn model_response(summary: &CategorySummary, text: String) -> AdviceResponse {
    let ParsedSections {
        mut insights,
        mut recommendations,
    } = parse_sections(&text);

    if insights.is_empty() {
        debug!("Model reply had no insights, backfilling");
        insights = heuristic::insights(summary);
    }
    if recommendations.is_empty() {
        debug!("Model reply had no recommendations, backfilling");
        recommendations = heuristic::recommendations(summary);
    }

    AdviceResponse {
        advice: text,
        insights,
        recommendations,
        timestamp: Utc::now(),
        source: AdviceSource::Model,
    }
}

fn log_llm_failure(e: &LlmError, client: &LlmClient) {
    match e {
        LlmError::Configuration(_) => error!(
            model = client.model(),
            host = client.host(),
            error = %e,
            "LLM rejected the request, check the API key and host; using heuristic advice"
        ),
        _ => warn!(
            model = client.model(),
            retryable = e.is_retryable(),
            error = %e,
            "LLM call failed, using heuristic advice"
        ),
    }
}
