//! Liveness and status endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub upstream_calls: u64,
    pub rate_limit: RateWindowStatus,
}

#[derive(Debug, Serialize)]
pub struct RateWindowStatus {
    pub capacity: usize,
    pub period_secs: u64,
    pub in_window: usize,
}

pub async fn get_health() -> &'static str {
    "ok"
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let limiter = state.service.limiter();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        upstream_calls: state.service.counter().current(),
        rate_limit: RateWindowStatus {
            capacity: limiter.capacity(),
            period_secs: limiter.period().as_secs(),
            in_window: limiter.in_window(),
        },
    })
}
