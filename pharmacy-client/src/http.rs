//! HTTP transport for the pharmacy REST API
//!
//! Credentials ride on cookies, so the underlying reqwest client is built
//! with a cookie store and every request carries the session automatically.
//! Reads and mutations get separate timeouts, and idempotent reads are
//! retried once on network failure (never on a 4xx/5xx).

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::ApiResponse;
use std::time::Duration;

/// HTTP client for making requests against the platform API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    read_timeout: Duration,
    mutate_timeout: Duration,
    retry_reads: bool,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ClientError::from_transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            read_timeout: config.read_timeout,
            mutate_timeout: config.mutate_timeout,
            retry_reads: config.retry_reads,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request, retrying once on network failure
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        match self.send_get(&url).await {
            Err(err) if self.retry_reads && err.is_retryable() => {
                tracing::warn!("GET {} failed ({}), retrying once", url, err);
                self.send_get(&url).await
            }
            other => other,
        }
    }

    async fn send_get<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.read_timeout)
            .send()
            .await
            .map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .timeout(self.mutate_timeout)
            .json(body)
            .send()
            .await
            .map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .timeout(self.mutate_timeout)
            .send()
            .await
            .map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Make a POST request with a multipart form (file upload)
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("POST {} (multipart)", url);
        let response = self
            .client
            .post(&url)
            .timeout(self.mutate_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .timeout(self.mutate_timeout)
            .json(body)
            .send()
            .await
            .map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .timeout(self.mutate_timeout)
            .send()
            .await
            .map_err(ClientError::from_transport)?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response, mapping non-2xx statuses to errors and
    /// unwrapping the `{success, message, data}` envelope when present.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(ClientError::from_transport)?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiResponse<Value>>(&text) {
                Ok(envelope) => envelope.message,
                Err(_) => text,
            };
            tracing::error!("Server error {}: {}", status, message);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("not JSON: {e}")))?;
        unwrap_envelope(value)
    }
}

/// Extract the payload from a response body.
///
/// Well-behaved endpoints wrap the payload in the standard envelope; at
/// least one endpoint returns the bare payload instead, so the envelope
/// shape is probed first and the body is used directly as a fallback.
fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> ClientResult<T> {
    if let Some(object) = value.as_object() {
        if object.contains_key("success") && object.contains_key("message") {
            let envelope: ApiResponse<Value> = serde_json::from_value(value.clone())?;
            if !envelope.success {
                return Err(ClientError::InvalidResponse(envelope.message));
            }
            let data = envelope.data.unwrap_or(Value::Null);
            return serde_json::from_value(data).map_err(Into::into);
        }
    }
    serde_json::from_value(value).map_err(Into::into)
}
