//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_calls` (gauge): total upstream attempts so far
//! - `gateway_upstream_retries_total` (counter): backoff sleeps taken
//! - `gateway_throttle_wait_seconds` (histogram): time spent waiting for a rate slot
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics exporter listening");
    Ok(())
}

pub fn record_request(status: u16, start: Instant) {
    counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_calls(total: u64) {
    gauge!("gateway_upstream_calls").set(total as f64);
}

/// Count one backoff before a retry.
pub fn record_retry() {
    counter!("gateway_upstream_retries_total").increment(1);
}

pub fn record_throttle_wait(waited: Duration) {
    histogram!("gateway_throttle_wait_seconds").record(waited.as_secs_f64());
}
