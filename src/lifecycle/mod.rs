//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → upstream source → limiter + retry policy → DocumentService
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM or Shutdown::trigger → stop accepting → drain in-flight → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - In-flight requests finish (or hit their deadline) before exit

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_service, StartupError};
