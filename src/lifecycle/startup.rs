//! Startup orchestration: turn a validated config into a ready service.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::{GatewayConfig, UpstreamConfig, UpstreamKind};
use crate::documents::service::retry_transient;
use crate::documents::DocumentService;
use crate::observability::CallCounter;
use crate::resilience::{PolicyError, RateLimiter, RateLimiterError, RetryPolicy};
use crate::upstream::{DocumentSource, HttpSource, StaticSource};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid rate limit: {0}")]
    RateLimit(#[from] RateLimiterError),

    #[error("invalid retry policy: {0}")]
    Retry(#[from] PolicyError),

    #[error("invalid upstream: {0}")]
    Upstream(String),
}

/// Build the document service and its shared state from configuration.
pub fn build_service(config: &GatewayConfig) -> Result<DocumentService, StartupError> {
    let source = build_source(&config.upstream)?;

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.capacity,
        config.rate_limit.period(),
    )?);

    let policy = RetryPolicy::new(
        config.retries.max_attempts,
        config.retries.base_delay(),
        config.retries.growth_factor,
        retry_transient,
    )?;

    tracing::info!(
        upstream = source.name(),
        capacity = config.rate_limit.capacity,
        period_secs = config.rate_limit.period_secs,
        max_attempts = config.retries.max_attempts,
        base_delay_ms = config.retries.base_delay_ms,
        growth_factor = config.retries.growth_factor,
        "Document service initialized"
    );

    Ok(DocumentService::new(source, limiter, policy, Arc::new(CallCounter::new()))
        .with_deadline(config.timeouts.request_deadline()))
}

fn build_source(config: &UpstreamConfig) -> Result<Arc<dyn DocumentSource>, StartupError> {
    match config.kind {
        UpstreamKind::Static => Ok(Arc::new(StaticSource::new(config.documents.clone()))),
        UpstreamKind::Http => {
            let raw = config
                .base_url
                .as_deref()
                .ok_or_else(|| StartupError::Upstream("base_url is required".into()))?;
            let base_url = Url::parse(raw)
                .map_err(|e| StartupError::Upstream(format!("bad base_url '{raw}': {e}")))?;
            let source = HttpSource::new(base_url, Duration::from_secs(config.timeout_secs))
                .map_err(|e| StartupError::Upstream(e.to_string()))?;
            Ok(Arc::new(source))
        }
    }
}
