//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request path produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!     → counter.rs (running total of upstream attempts)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint
//!     → GET /status
//! ```

pub mod counter;
pub mod logging;
pub mod metrics;

pub use counter::CallCounter;
