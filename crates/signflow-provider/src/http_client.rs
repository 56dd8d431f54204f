//! Shared HTTP client for the provider REST API
//!
//! One `reqwest::Client` is built per provider instance and reused for every
//! call, so connections are pooled. The client never retries: each
//! `execute` is exactly one request.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use signflow_utils::error::SignError;

/// Idle pooled connections are dropped after this long
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Build the client with a per-request and a connect timeout.
    ///
    /// # Errors
    ///
    /// Returns `SignError::Misconfiguration` if the client cannot be constructed
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Result<Self, SignError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| SignError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    pub fn get(&self, url: url::Url) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: url::Url) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send a request once.
    ///
    /// Any HTTP status counts as a response; only failures that never reach
    /// a status (connect, TLS, timeout) become `SignError::Transport`.
    pub async fn execute(
        &self,
        request_builder: RequestBuilder,
        provider_op: &str,
    ) -> Result<Response, SignError> {
        let request = request_builder
            .build()
            .map_err(|e| SignError::transport(format!("{provider_op}: failed to build request: {e}")))?;

        debug!(provider_op, url = %request.url(), "Executing provider request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(
                    provider_op,
                    status = response.status().as_u16(),
                    "Provider responded"
                );
                Ok(response)
            }
            Err(e) if e.is_timeout() => Err(SignError::transport(format!(
                "{provider_op} timed out: {e}"
            ))),
            Err(e) => Err(SignError::transport(format!(
                "{provider_op} request failed: {e}"
            ))),
        }
    }
}

/// Pass 2xx responses through; turn anything else into `SignError::Provider`.
pub(crate) async fn error_for_status(response: Response) -> Result<Response, SignError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(map_status_error(status, &body))
}

/// Map a non-success status and its body to the provider error.
///
/// The body is redacted and truncated before it is stored.
pub(crate) fn map_status_error(status: StatusCode, body: &str) -> SignError {
    SignError::provider(status.as_u16(), body)
}

/// Read a whole response body.
pub(crate) async fn read_body(response: Response, provider_op: &str) -> Result<Vec<u8>, SignError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| SignError::transport(format!("{provider_op}: failed to read body: {e}")))
}
