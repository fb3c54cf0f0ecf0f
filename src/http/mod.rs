//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → server.rs documents_handler → DocumentService
//!     → response.rs (map FetchError to status + JSON detail)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod status;

pub use response::ApiError;
pub use server::{AppState, HttpServer};
