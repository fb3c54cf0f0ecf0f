//! Request orchestration: rate limit, then retry, then upstream.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::documents::date::{DateError, TargetDate};
use crate::observability::CallCounter;
use crate::resilience::timeouts::{with_deadline, DeadlineExceeded};
use crate::resilience::{RateLimiter, RetryError, RetryPolicy};
use crate::upstream::{DocumentList, DocumentSource, UpstreamError};

/// Why a document fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target date is malformed. Never retried.
    #[error(transparent)]
    Validation(#[from] DateError),

    /// Upstream failed fatally or ran out of retries.
    #[error(transparent)]
    Upstream(#[from] RetryError<UpstreamError>),

    /// The request deadline elapsed while throttled or backing off.
    #[error("upstream request abandoned: {0}")]
    DeadlineExceeded(#[from] DeadlineExceeded),
}

/// Composes the rate limiter, retry policy and upstream source.
///
/// Cheap to clone; all shared state sits behind `Arc`.
#[derive(Clone)]
pub struct DocumentService {
    source: Arc<dyn DocumentSource>,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy<UpstreamError>,
    counter: Arc<CallCounter>,
    deadline: Option<Duration>,
}

impl DocumentService {
    /// Assemble a service with no request deadline.
    pub fn new(
        source: Arc<dyn DocumentSource>,
        limiter: Arc<RateLimiter>,
        policy: RetryPolicy<UpstreamError>,
        counter: Arc<CallCounter>,
    ) -> Self {
        Self {
            source,
            limiter,
            policy,
            counter,
            deadline: None,
        }
    }

    /// Bound the total time spent throttled and retrying.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Limiter shared by every request through this service.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Upstream call counter, one tick per attempt.
    pub fn counter(&self) -> &Arc<CallCounter> {
        &self.counter
    }

    /// Retrieve the documents published on `target_date` (`YYYY-MM-DD`).
    pub async fn fetch_documents(&self, target_date: &str) -> Result<DocumentList, FetchError> {
        let date: TargetDate = target_date.parse()?;
        let documents = with_deadline(self.deadline, self.throttled_fetch(&date)).await??;
        Ok(documents)
    }

    async fn throttled_fetch(
        &self,
        date: &TargetDate,
    ) -> Result<DocumentList, RetryError<UpstreamError>> {
        self.limiter.acquire().await;
        self.policy.execute(|| self.attempt(date)).await
    }

    async fn attempt(&self, date: &TargetDate) -> Result<DocumentList, UpstreamError> {
        let calls = self.counter.increment();
        tracing::info!(
            date = %date,
            upstream = self.source.name(),
            upstream_calls = calls,
            "Fetching document list"
        );
        self.source.fetch(date).await
    }
}

/// Retry predicate used for upstream calls.
pub fn retry_transient(error: &UpstreamError) -> bool {
    error.is_transient()
}
