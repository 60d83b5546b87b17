//! Deterministic, API-free completion provider.
//!
//! Used by the test suites and for running the pipeline offline. Every
//! request is recorded so callers can assert on the prompts that were sent.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{CompletionError, CompletionProvider, CompletionRequest};

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync>;
type Delay = Box<dyn Fn(&CompletionRequest) -> Duration + Send + Sync>;

/// Mock provider answering with a caller-supplied function.
pub struct MockCompletion {
    responder: Responder,
    delay: Option<Delay>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletion {
    /// Answer every request with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Return the user prompt unchanged.
    pub fn echo() -> Self {
        Self::new(|request| Ok(request.prompt.clone()))
    }

    /// Fail every request with the given message.
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(CompletionError::Provider(message.clone())))
    }

    /// Sleep before answering, for simulating slow or out-of-order calls.
    pub fn with_delay<D>(mut self, delay: D) -> Self
    where
        D: Fn(&CompletionRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CompletionProvider for MockCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(request)).await;
        }

        (self.responder)(request)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
