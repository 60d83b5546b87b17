//! Fixed-interval rate limiting for completion calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::{CompletionError, CompletionProvider, CompletionRequest};

/// Spaces call dispatch by a minimum interval derived from a
/// requests-per-minute budget.
///
/// The lock is held only while waiting for the slot and stamping the
/// dispatch time, so dispatch is serialized process-wide while responses
/// are processed concurrently.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_minute` dispatches per minute.
    ///
    /// Zero disables limiting.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let min_interval = if requests_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(60.0 / f64::from(requests_per_minute))
        };
        Self::with_interval(min_interval)
    }

    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next dispatch slot is free and claim it.
    pub async fn acquire(&self) {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limiter delaying dispatch");
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// A provider whose calls go through a shared [`RateLimiter`].
pub struct RateLimited<P> {
    inner: P,
    limiter: Arc<RateLimiter>,
}

impl<P: CompletionProvider> RateLimited<P> {
    pub fn new(inner: P, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for RateLimited<P> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.limiter.acquire().await;
        self.inner.complete(request).await
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}
