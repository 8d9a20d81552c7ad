//! Mock backend for testing
//!
//! Replies are scripted: queue texts or failures and they are returned in
//! order, falling back to a canned structured answer once the queue is empty.
//! Clones share the queue and counters, so a test can keep a handle while the
//! service owns another.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::types::{CompletionRequest, LlmError};
use super::LlmBackend;

/// Reply used when nothing is scripted
pub const CANNED_ADVICE: &str = "INSIGHTS:
- Your spending is concentrated in a few essential categories
- Income comfortably covers your regular expenses

RECOMMENDATIONS:
- Review recurring charges once a month
- Move a fixed amount to savings right after each paycheck

POSITIVE:
You're tracking your finances, which is a great first step toward financial wellness!";

/// One scripted outcome
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(LlmError),
}

#[derive(Clone)]
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
    model: String,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
            model: "mock".to_string(),
            healthy: true,
        }
    }

    /// Mock whose next call answers with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.push(MockReply::Text(text.into()));
        backend
    }

    /// Mock whose next call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        let backend = Self::new();
        backend.push(MockReply::Fail(error));
        backend
    }

    /// Wait this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Queue a reply
    pub fn push(&self, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt of the most recent completion
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match scripted {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(error)) => Err(error),
            None => Ok(CANNED_ADVICE.to_string()),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://"
    }
}
