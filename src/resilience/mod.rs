//! Resilience subsystem: everything between the request handler and the upstream.
//!
//! # Data Flow
//! ```text
//! fetch request:
//!     → timeouts.rs (optional deadline over the whole exchange)
//!     → rate_limiter.rs (wait for a slot in the trailing window)
//!     → retries.rs (call upstream, back off on transient failures)
//!         → backoff.rs (delay schedule)
//! ```
//!
//! # Design Decisions
//! - One limiter per process, shared via Arc; callers wait instead of failing
//! - Backoff is deterministic (no jitter)
//! - No lock is held while a caller sleeps

pub mod backoff;
pub mod rate_limiter;
pub mod retries;
pub mod timeouts;

pub use backoff::ExponentialBackoff;
pub use rate_limiter::{RateLimiter, RateLimiterError, MAX_PERIOD};
pub use retries::{PolicyError, RetryError, RetryPolicy};
