//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges and cross-field
//! requirements. All problems are reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, UpstreamKind};
use crate::resilience::rate_limiter::MAX_PERIOD;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check value ranges and cross-field rules, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.rate_limit.capacity == 0 {
        errors.push(ValidationError::new("rate_limit.capacity", "must be at least 1"));
    }
    if config.rate_limit.period_secs == 0 {
        errors.push(ValidationError::new("rate_limit.period_secs", "must be at least 1"));
    } else if config.rate_limit.period_secs > MAX_PERIOD.as_secs() {
        errors.push(ValidationError::new(
            "rate_limit.period_secs",
            format!("must be at most {}", MAX_PERIOD.as_secs()),
        ));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.growth_factor == 0 {
        errors.push(ValidationError::new("retries.growth_factor", "must be at least 1"));
    }

    if config.upstream.kind == UpstreamKind::Http {
        match config.upstream.base_url.as_deref() {
            None => errors.push(ValidationError::new(
                "upstream.base_url",
                "required when upstream.kind is \"http\"",
            )),
            Some(raw) => {
                if let Err(e) = Url::parse(raw) {
                    errors.push(ValidationError::new(
                        "upstream.base_url",
                        format!("'{raw}' is not a valid URL: {e}"),
                    ));
                }
            }
        }
        if config.upstream.timeout_secs == 0 {
            errors.push(ValidationError::new("upstream.timeout_secs", "must be at least 1"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
