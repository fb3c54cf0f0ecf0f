//! Rate-limited, retrying gateway for date-indexed document lists.

pub mod config;
pub mod documents;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::GatewayConfig;
pub use documents::DocumentService;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
