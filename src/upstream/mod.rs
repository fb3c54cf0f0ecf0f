//! Upstream document sources.
//!
//! # Responsibilities
//! - Define the outbound contract (`DocumentSource`)
//! - Classify failures as transient (worth retrying) or fatal
//!
//! # Design Decisions
//! - Sources know nothing about throttling or retries; the caller wraps them
//! - The transient/fatal split is decided where the failure is observed

pub mod fixed;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::documents::TargetDate;

pub use self::fixed::StaticSource;
pub use self::http::HttpSource;

/// Documents published on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<String>,
}

impl DocumentList {
    /// Wrap document identifiers in upstream order.
    pub fn new(documents: Vec<String>) -> Self {
        Self { documents }
    }
}

/// Failure reported by an upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Likely to succeed on retry (timeouts, overload, 5xx).
    #[error("transient upstream error: {0}")]
    Transient(String),

    /// Retrying will not help.
    #[error("upstream error: {0}")]
    Fatal(String),
}

impl UpstreamError {
    /// Whether a retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, UpstreamError::Transient(_))
    }
}

/// Something that can list documents for a date.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, date: &TargetDate) -> Result<DocumentList, UpstreamError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}
