//! The retrying HTTP client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::RemoteCallError;

/// Capability set the gateways need from an outbound client.
///
/// [`ServiceClient`] is the production implementation; tests substitute a
/// double that serves canned responses.
#[async_trait]
pub trait CallClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, RemoteCallError>;
    async fn post(&self, path: &str, body: Value) -> Result<Value, RemoteCallError>;
}

#[async_trait]
impl<T: CallClient + ?Sized> CallClient for Arc<T> {
    async fn get(&self, path: &str) -> Result<Value, RemoteCallError> {
        self.as_ref().get(path).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, RemoteCallError> {
        self.as_ref().post(path, body).await
    }
}

/// Tunables for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// How many times a failed call is resubmitted before giving up.
    pub max_retries: u32,
    /// Fixed delay between attempts. No jitter, no backoff.
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

/// Outbound HTTP client with bounded, fixed-interval retries.
///
/// Every failed attempt, transport error or non-2xx response alike, is
/// retried uniformly until the attempt budget runs out; there is no circuit
/// breaking and no per-status exemption, so a 404 costs the full retry
/// budget just like a 503.
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

enum CallFailure {
    /// The remote answered with a non-success status.
    Response { status: u16, body: Vec<u8> },
    /// No response at all (connect failure, timeout, broken stream).
    Transport(reqwest::Error),
}

impl ServiceClient {
    /// Build a client with the default timeout/retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying reqwest client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Self::with_config(base_url, ClientConfig::default())
    }

    /// Build a client with an explicit policy.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying reqwest client cannot be
    /// constructed.
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, RemoteCallError> {
        let url = self.url(path);
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(&method, &url, body).await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    attempt += 1;
                    if attempt <= self.max_retries {
                        tracing::warn!(
                            "retrying request to {url} (attempt {attempt}/{})",
                            self.max_retries
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        continue;
                    }
                    self.log_final_failure(&method, &url, &failure);
                    return Err(classify(&method, &failure));
                }
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, CallFailure> {
        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(CallFailure::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(CallFailure::Transport)?;
        if !status.is_success() {
            return Err(CallFailure::Response {
                status: status.as_u16(),
                body: bytes.to_vec(),
            });
        }
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        // Non-JSON success bodies pass through as raw text.
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(_) => Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        }
    }

    fn log_final_failure(&self, method: &Method, url: &str, failure: &CallFailure) {
        match failure {
            CallFailure::Response { status, body } => tracing::error!(
                %method,
                url,
                status = *status,
                body = %String::from_utf8_lossy(body),
                "request failed after {} retries",
                self.max_retries
            ),
            CallFailure::Transport(err) => tracing::error!(
                %method,
                url,
                error = %err,
                "request failed after {} retries",
                self.max_retries
            ),
        }
    }
}

#[async_trait]
impl CallClient for ServiceClient {
    async fn get(&self, path: &str) -> Result<Value, RemoteCallError> {
        self.execute(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, RemoteCallError> {
        self.execute(Method::POST, path, Some(&body)).await
    }
}

fn classify(method: &Method, failure: &CallFailure) -> RemoteCallError {
    match failure {
        CallFailure::Response { status, body } => classify_response(method, *status, body),
        CallFailure::Transport(_) => RemoteCallError::new(500, "Unknown error occurred"),
    }
}

fn classify_response(method: &Method, status: u16, body: &[u8]) -> RemoteCallError {
    if *method == Method::GET && status == 404 {
        return RemoteCallError::new(404, "Resource not found");
    }
    let message =
        error_message(body).unwrap_or_else(|| "Service request failed".to_string());
    RemoteCallError::new(status, message)
}

/// Pull the `message` field out of a remote error body, if it has one.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_not_found_maps_to_resource_not_found() {
        let err = classify_response(&Method::GET, 404, br#"{"message":"no such user"}"#);
        assert_eq!(err, RemoteCallError::new(404, "Resource not found"));
    }

    #[test]
    fn post_not_found_keeps_remote_message() {
        let err = classify_response(&Method::POST, 404, br#"{"message":"no such product"}"#);
        assert_eq!(err, RemoteCallError::new(404, "no such product"));
    }

    #[test]
    fn remote_message_is_extracted() {
        let err = classify_response(&Method::GET, 400, br#"{"message":"Insufficient stock"}"#);
        assert_eq!(err, RemoteCallError::new(400, "Insufficient stock"));
    }

    #[test]
    fn missing_message_falls_back_to_default() {
        let err = classify_response(&Method::GET, 503, br#"{"error":"boom"}"#);
        assert_eq!(err, RemoteCallError::new(503, "Service request failed"));
    }

    #[test]
    fn unparseable_error_body_falls_back_to_default() {
        let err = classify_response(&Method::GET, 500, b"<html>oops</html>");
        assert_eq!(err, RemoteCallError::new(500, "Service request failed"));
    }

    #[test]
    fn transport_failure_has_populated_status() {
        // No response at all still yields a status code.
        let err = RemoteCallError::new(500, "Unknown error occurred");
        assert_eq!(err.status, 500);
        assert!(!err.is_not_found());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ServiceClient::new("http://localhost:3001/api/").unwrap();
        assert_eq!(client.url("/users/abc"), "http://localhost:3001/api/users/abc");
    }
}
