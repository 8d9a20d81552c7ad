//! Pocketwise Core Library
//!
//! Shared functionality for the Pocketwise spending analytics service:
//! - Transaction store with lenient or strict loading from JSON/CSV
//! - Analytics engine for category summaries and timelines
//! - Advisory service with an LLM path and a deterministic heuristic fallback
//! - Pluggable LLM backends (OpenAI-compatible, Ollama, mock)
//! - Layered configuration

pub mod advice;
pub mod ai;
pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

/// Test utilities including mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advice::{AdvisoryService, CompletionSettings, HeuristicAdvice};
pub use ai::{
    CompletionRequest, LlmBackend, LlmClient, LlmError, MockBackend, MockReply, OllamaBackend,
    OpenAICompatibleBackend,
};
pub use analytics::{AnalyticsEngine, TransactionFilter};
pub use config::{BackendKind, Config, LlmConfig};
pub use error::{Error, Result};
pub use models::*;
pub use store::{LoadReport, TransactionStore, ValidationPolicy};
