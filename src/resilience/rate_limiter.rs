//! Global sliding-window rate limiter for outbound calls.
//!
//! Callers are delayed, never rejected: `acquire` waits until the trailing
//! window has room, then records the call.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::observability::metrics;

/// Longest accepted window length (one year).
pub const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimiterError {
    #[error("rate limit capacity must be at least 1")]
    ZeroCapacity,

    #[error("rate limit period must be non-zero")]
    ZeroPeriod,

    #[error("rate limit period {0:?} exceeds the maximum of {max:?}", max = MAX_PERIOD)]
    PeriodTooLong(Duration),
}

/// At most `capacity` admissions in any trailing `period`.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    period: Duration,
    /// Admission instants still inside the trailing window, oldest first.
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `capacity` calls per trailing `period`.
    ///
    /// Fails on a zero capacity, a zero period, or a period above [`MAX_PERIOD`].
    pub fn new(capacity: usize, period: Duration) -> Result<Self, RateLimiterError> {
        if capacity == 0 {
            return Err(RateLimiterError::ZeroCapacity);
        }
        if period.is_zero() {
            return Err(RateLimiterError::ZeroPeriod);
        }
        if period > MAX_PERIOD || Instant::now().checked_add(period).is_none() {
            return Err(RateLimiterError::PeriodTooLong(period));
        }

        Ok(Self {
            capacity,
            period,
            window: Mutex::new(VecDeque::with_capacity(capacity)),
        })
    }

    /// Maximum admissions per window.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the trailing window.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for a free slot, record it and return the recorded instant.
    ///
    /// The lock is only held for the check-and-record step, never across the
    /// sleep. Woken waiters re-check, so simultaneous wakeups cannot overshoot
    /// the capacity.
    pub async fn acquire(&self) -> Instant {
        let started = Instant::now();

        loop {
            let wait = match self.admit(Instant::now()) {
                Ok(admitted) => {
                    let waited = admitted.saturating_duration_since(started);
                    if !waited.is_zero() {
                        tracing::debug!(waited = ?waited, "Admitted after throttling");
                    }
                    metrics::record_throttle_wait(waited);
                    return admitted;
                }
                Err(wait) => wait,
            };

            tracing::debug!(
                capacity = self.capacity,
                period = ?self.period,
                wait = ?wait,
                "Rate limit reached, waiting for a free slot"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Record a call if there is room right now.
    pub fn try_acquire(&self) -> Option<Instant> {
        self.admit(Instant::now()).ok()
    }

    /// Number of calls counted against the current trailing window.
    pub fn in_window(&self) -> usize {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        Self::prune(&mut window, self.period, Instant::now());
        window.len()
    }

    /// Admit at `now`, or report how long until the oldest recorded call
    /// leaves the window.
    fn admit(&self, now: Instant) -> Result<Instant, Duration> {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        Self::prune(&mut window, self.period, now);

        if window.len() < self.capacity {
            window.push_back(now);
            return Ok(now);
        }

        // Non-empty: capacity >= 1 and the window is full.
        let oldest = window.front().copied().unwrap_or(now);
        let wait = oldest
            .checked_add(self.period)
            .map(|expires| expires.saturating_duration_since(now))
            .unwrap_or(self.period);
        Err(wait)
    }

    /// Drop calls that have left the window. An expiry past the clock's range
    /// never arrives.
    fn prune(window: &mut VecDeque<Instant>, period: Duration, now: Instant) {
        while let Some(&oldest) = window.front() {
            match oldest.checked_add(period) {
                Some(expires) if expires <= now => {
                    window.pop_front();
                }
                _ => break,
            }
        }
    }
}
