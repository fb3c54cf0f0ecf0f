//! Retry with exponential backoff.
//!
//! # State Machine
//! ```text
//! Attempting(n) → success                          → Done(value)
//! Attempting(n) → retryable failure, n < max       → sleep(delay(n)) → Attempting(n+1)
//! Attempting(n) → retryable failure, n == max      → Exhausted(last error)
//! Attempting(n) → non-retryable failure            → Failed(error)
//! ```
//!
//! Delays are deterministic (no jitter). Sleeping is a tokio timer, so other
//! tasks keep running while a caller backs off.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::observability::metrics;
use crate::resilience::backoff::ExponentialBackoff;

/// Invalid retry policy parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("growth_factor must be at least 1")]
    ZeroGrowthFactor,
}

/// Terminal failure of a retried operation.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    /// The operation failed with an error the policy does not retry.
    #[error("{0}")]
    Fatal(E),
}

impl<E> RetryError<E> {
    /// The underlying error, whichever way the retries ended.
    pub fn last_error(&self) -> &E {
        match self {
            RetryError::Exhausted { last, .. } => last,
            RetryError::Fatal(e) => e,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Immutable retry configuration for one kind of operation.
pub struct RetryPolicy<E> {
    max_attempts: u32,
    backoff: ExponentialBackoff,
    retryable: Predicate<E>,
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            backoff: self.backoff,
            retryable: self.retryable.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl<E> RetryPolicy<E>
where
    E: fmt::Display,
{
    /// Create a policy. `retryable` decides which errors are transient.
    pub fn new<P>(
        max_attempts: u32,
        base_delay: Duration,
        growth_factor: u32,
        retryable: P,
    ) -> Result<Self, PolicyError>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        if growth_factor == 0 {
            return Err(PolicyError::ZeroGrowthFactor);
        }

        Ok(Self {
            max_attempts,
            backoff: ExponentialBackoff::new(base_delay, growth_factor),
            retryable: Arc::new(retryable),
        })
    }

    /// Whether the policy treats `error` as transient.
    pub fn is_retryable(&self, error: &E) -> bool {
        (self.retryable)(error)
    }

    /// Run `operation` until it succeeds, fails fatally, or runs out of attempts.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 1;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !self.is_retryable(&error) {
                tracing::debug!(attempt, error = %error, "Non-retryable failure");
                return Err(RetryError::Fatal(error));
            }

            if attempt >= self.max_attempts {
                tracing::error!(
                    attempts = attempt,
                    error = %error,
                    "Giving up after exhausting retries"
                );
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = self.backoff.delay(attempt);
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay = ?delay,
                error = %error,
                "Backing off before retry"
            );
            metrics::record_retry();
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
