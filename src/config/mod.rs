//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), optional
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → lifecycle::startup builds the subsystems from it
//! ```
//!
//! # Design Decisions
//! - Config is fixed at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, RetryConfig,
    TimeoutConfig, UpstreamConfig, UpstreamKind,
};
pub use validation::{validate_config, ValidationError};
