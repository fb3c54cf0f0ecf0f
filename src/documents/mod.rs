//! Document retrieval: the orchestration between the HTTP handler and upstream.
//!
//! # Data Flow
//! ```text
//! "2023-05-30"
//!     → date.rs (validate into TargetDate)
//!     → service.rs
//!         → RateLimiter::acquire (once per request)
//!         → RetryPolicy::execute
//!             → CallCounter::increment + DocumentSource::fetch (once per attempt)
//!     → DocumentList or FetchError
//! ```

pub mod date;
pub mod service;

pub use date::{DateError, TargetDate};
pub use service::{DocumentService, FetchError};
