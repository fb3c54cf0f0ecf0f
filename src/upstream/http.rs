//! Upstream source reached over HTTP.
//!
//! Requests `GET {base_url}/documents/{date}` and expects a JSON body of the
//! form `{"documents": [...]}`.
//!
//! # Failure classification
//! - Timeouts, connection failures, 429 and 5xx: transient
//! - Other non-success statuses and undecodable bodies: fatal

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::documents::TargetDate;
use crate::upstream::{DocumentList, DocumentSource, UpstreamError};

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Client with a per-request `timeout` against `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    fn documents_url(&self, date: &TargetDate) -> Result<Url, UpstreamError> {
        self.base_url
            .join(&format!("documents/{date}"))
            .map_err(|e| UpstreamError::Fatal(format!("invalid upstream url: {e}")))
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, date: &TargetDate) -> Result<DocumentList, UpstreamError> {
        let url = self.documents_url(date)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            tracing::debug!(url = %url, status = %status, "Upstream returned an error status");
            return Err(err);
        }

        response
            .json::<DocumentList>()
            .await
            .map_err(classify_transport)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Map a non-success status to an upstream error. `None` for success.
pub fn classify_status(status: StatusCode) -> Option<UpstreamError> {
    if status.is_success() {
        return None;
    }

    let detail = format!("upstream responded with {status}");
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Some(UpstreamError::Transient(detail))
    } else {
        Some(UpstreamError::Fatal(detail))
    }
}

fn classify_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() || err.is_connect() {
        UpstreamError::Transient(err.to_string())
    } else if err.is_decode() {
        UpstreamError::Fatal(format!("malformed upstream response: {err}"))
    } else if err.is_request() || err.is_body() {
        UpstreamError::Transient(err.to_string())
    } else {
        UpstreamError::Fatal(err.to_string())
    }
}
