//! Deadline enforcement for a whole upstream exchange.
//!
//! Throttling and backoff can keep a request waiting for minutes. A deadline
//! drops the in-flight future, which cancels any pending sleep or upstream
//! call at its next await point.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} exceeded")]
pub struct DeadlineExceeded(pub Duration);

/// Run `fut` under an optional deadline. `None` waits indefinitely.
pub async fn with_deadline<F>(
    deadline: Option<Duration>,
    fut: F,
) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| DeadlineExceeded(limit)),
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_cancels_slow_future() {
        let result = with_deadline(Some(Duration::from_secs(1)), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "late"
        })
        .await;

        assert_eq!(result, Err(DeadlineExceeded(Duration::from_secs(1))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_deadline_waits() {
        let result = with_deadline(None, async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            42
        })
        .await;

        assert_eq!(result, Ok(42));
    }
}
