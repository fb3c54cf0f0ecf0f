//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file. Every
//! section has defaults, so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound rate ceiling.
    pub rate_limit: RateLimitConfig,

    /// Retry and backoff settings for upstream calls.
    pub retries: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Where documents come from.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Global limit on outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum calls admitted within one period.
    pub capacity: usize,

    /// Length of the trailing window in seconds.
    pub period_secs: u64,
}

impl RateLimitConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 30,
            period_secs: 60,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, the first one included.
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after each failed retry.
    pub growth_factor: u32,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            growth_factor: 5,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for one inbound request, throttling and retries included.
    /// 0 disables the deadline.
    pub request_secs: u64,
}

impl TimeoutConfig {
    pub fn request_deadline(&self) -> Option<Duration> {
        (self.request_secs > 0).then(|| Duration::from_secs(self.request_secs))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 0 }
    }
}

/// Which upstream implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamKind {
    /// Fixed in-process document list.
    #[default]
    Static,
    /// Remote HTTP service.
    Http,
}

/// Upstream source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub kind: UpstreamKind,

    /// Documents served by the static source.
    pub documents: Vec<String>,

    /// Base URL of the HTTP source (e.g., "http://10.0.0.5:9000/api").
    pub base_url: Option<String>,

    /// Per-call timeout for the HTTP source in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            kind: UpstreamKind::Static,
            documents: vec!["doc1".into(), "doc2".into(), "doc3".into()],
            base_url: None,
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
