//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener until shutdown

use std::future::Future;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::documents::DocumentService;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::http::response::ApiError;
use crate::http::status::{get_health, get_status};
use crate::lifecycle::{build_service, StartupError};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: DocumentService,
}

/// HTTP server for the document gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around an already built service.
    pub fn new(service: DocumentService) -> Self {
        let router = Self::build_router(AppState { service });
        Self { router }
    }

    /// Build the service from configuration, then the server.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, StartupError> {
        let service = build_service(config)?;
        Ok(Self::new(service))
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/documents/{target_date}", get(documents_handler))
            .route("/health", get(get_health))
            .route("/status", get(get_status))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /documents/{target_date}`
async fn documents_handler(
    State(state): State<AppState>,
    Path(target_date): Path<String>,
) -> Response {
    let start_time = Instant::now();
    tracing::debug!(target_date = %target_date, "Document list requested");

    let response = match state.service.fetch_documents(&target_date).await {
        Ok(documents) => (StatusCode::OK, Json(documents)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    };

    metrics::record_request(response.status().as_u16(), start_time);
    response
}
