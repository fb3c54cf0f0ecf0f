//! Deterministic exponential backoff.

use std::time::Duration;

/// Exponential backoff schedule without jitter.
///
/// The delay before retry `n` (1-based) is `base * factor^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base: Duration,
    factor: u32,
}

impl ExponentialBackoff {
    /// Schedule starting at `base` and multiplying by `factor` per retry.
    pub fn new(base: Duration, factor: u32) -> Self {
        Self { base, factor }
    }

    /// Delay to wait after the given failed attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base, self.factor)
    }
}

/// Calculate the exponential backoff delay for a failed attempt.
///
/// Attempt 0 never waits. Large exponents saturate instead of overflowing.
pub fn calculate_backoff(attempt: u32, base: Duration, factor: u32) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let multiplier = factor.saturating_pow(attempt - 1);
    base.saturating_mul(multiplier)
}
