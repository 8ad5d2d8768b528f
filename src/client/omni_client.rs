//! Omni HTTP Client
//!
//! Transport core shared by every resource API: URL assembly, auth headers,
//! JSON payload encoding and status classification.

use http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use http::Method;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

use crate::error::{ApiError, HttpError, OmniError};
use crate::types::ApiKey;

/// Versioned prefix every resource path is resolved against.
pub const API_PREFIX: &str = "/api/v2";

pub(crate) const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const JSON_CONTENT_TYPE: &str = "application/json";

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<reqwest::Response, reqwest::Error>> + Send>>;
pub(crate) type MiddlewareExecutor =
    Arc<dyn Fn(reqwest::Request) -> MiddlewareFuture + Send + Sync>;

/// Omni API Client
///
/// Reusable HTTP client for calling the Omni v2 API.
/// Built with reqwest for async HTTP requests.
#[derive(Clone)]
pub struct OmniClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
    middleware_executor: Option<MiddlewareExecutor>,
}

impl std::fmt::Debug for OmniClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmniClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field(
                "middleware_executor",
                &self.middleware_executor.as_ref().map(|_| ".."),
            )
            .finish_non_exhaustive()
    }
}

impl OmniClient {
    /// Create a new client builder
    pub fn builder() -> OmniClientBuilder {
        OmniClientBuilder::default()
    }

    /// Get the base URL (without trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.as_str()
    }

    /// Absolute URL for a path relative to [`API_PREFIX`]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Returns the underlying [`reqwest::Client`] for raw HTTP requests.
    ///
    /// Note: requests made through this client bypass the middleware pipeline
    /// and carry no API key. Use [`request`](Self::request) for authenticated calls.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn with_middleware_executor(mut self, executor: MiddlewareExecutor) -> Self {
        self.middleware_executor = Some(executor);
        self
    }

    pub(crate) async fn send_request(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(executor) = &self.middleware_executor {
            (executor)(request).await
        } else {
            self.http.execute(request).await
        }
    }

    /// Perform one round trip against the Omni API.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Resource path relative to `/api/v2` (e.g., "/instances")
    /// * `query` - Query parameters; encoded sorted by key
    /// * `body` - Optional payload, serialized as JSON
    ///
    /// # Returns
    /// The raw response body for status < 400
    ///
    /// # Errors
    /// - `OmniError::Http` when encoding, sending or reading fails (including timeouts)
    /// - `OmniError::Api` for status >= 400
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Vec<u8>, OmniError> {
        let url = self.api_url(path);

        let mut builder = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if !query.is_empty() {
            let mut pairs = query.to_vec();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            builder = builder.query(&pairs);
        }

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(HttpError::Encode)?;
            builder = builder.body(payload);
        }

        let request = builder.build().map_err(HttpError::Build)?;
        self.execute(request).await
    }

    /// Send a prepared request and classify the response.
    pub async fn execute(&self, request: reqwest::Request) -> Result<Vec<u8>, OmniError> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!("[Omni] >>> {} {}", method, path);

        let response = self.send_request(request).await.map_err(HttpError::Send)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(HttpError::Read)?;

        if status >= 400 {
            let err = ApiError::from_response(status, &body);
            debug!(
                "[Omni] <<< {} {} failed: status={} code={:?}",
                method, path, status, err.code
            );
            return Err(err.into());
        }

        debug!("[Omni] <<< {} {} status={}", method, path, status);
        Ok(body.to_vec())
    }

    /// GET request with query parameters
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, OmniError> {
        self.request::<()>(Method::GET, path, query, None).await
    }

    /// POST request with a JSON payload
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, OmniError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// POST request with no body, used by action endpoints
    pub async fn post_empty(&self, path: &str) -> Result<Vec<u8>, OmniError> {
        self.request::<()>(Method::POST, path, &[], None).await
    }

    /// PATCH request with a JSON payload
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, OmniError> {
        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    /// DELETE request; the response body is discarded
    pub async fn delete(&self, path: &str) -> Result<(), OmniError> {
        self.request::<()>(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }
}

impl Service<reqwest::Request> for OmniClient {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = MiddlewareFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.http.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

/// Builder for OmniClient
///
/// # Example
///
/// ```rust
/// use omni_sdk::client::OmniClient;
/// use omni_sdk::types::ApiKey;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OmniClient::builder()
///     .base_url("http://localhost:8882")
///     .api_key(ApiKey::new("omni_sk_your_key")?)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct OmniClientBuilder {
    base_url: Option<String>,
    api_key: Option<ApiKey>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl OmniClientBuilder {
    /// Set the server base URL (e.g., "http://localhost:8882")
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the total timeout for requests
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    ///
    /// Default: 10 seconds
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the OmniClient
    ///
    /// # Errors
    /// Returns `OmniError::Config` if base_url or api_key is missing, or
    /// base_url is not an http(s) URL
    pub fn build(self) -> Result<OmniClient, OmniError> {
        let api_key = self
            .api_key
            .ok_or_else(|| OmniError::Config("api_key is required".to_string()))?;
        let base_url = self
            .base_url
            .ok_or_else(|| OmniError::Config("base_url is required".to_string()))?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(OmniError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                base_url
            )));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = self
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| OmniError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(OmniClient {
            http: client,
            api_key,
            base_url,
            middleware_executor: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> ApiKey {
        ApiKey::new("omni_sk_test_key").unwrap()
    }

    #[test]
    fn test_builder_values() {
        let client = OmniClient::builder()
            .base_url("http://localhost:8882")
            .api_key(test_key())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:8882");
        assert_eq!(client.api_key(), "omni_sk_test_key");
    }

    #[test]
    fn test_builder_strips_trailing_slash() {
        let client = OmniClient::builder()
            .base_url("http://localhost:8882//")
            .api_key(test_key())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:8882");
        assert_eq!(
            client.api_url("/instances"),
            "http://localhost:8882/api/v2/instances"
        );
    }

    #[test]
    fn test_builder_custom_timeouts() {
        let client = OmniClient::builder()
            .base_url("https://omni.example.com")
            .api_key(test_key())
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        // reqwest::Client doesn't expose timeout getters
        assert_eq!(client.base_url(), "https://omni.example.com");
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = OmniClient::builder()
            .base_url("http://localhost:8882")
            .build();

        assert!(matches!(result, Err(OmniError::Config(_))));
    }

    #[test]
    fn test_builder_missing_base_url() {
        let result = OmniClient::builder().api_key(test_key()).build();

        assert!(matches!(result, Err(OmniError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_non_http_base_url() {
        let result = OmniClient::builder()
            .base_url("localhost:8882")
            .api_key(test_key())
            .build();

        match result {
            Err(OmniError::Config(msg)) => assert!(msg.contains("http://")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let client = OmniClient::builder()
            .base_url("http://localhost:8882")
            .api_key(test_key())
            .build()
            .unwrap();

        let debug = format!("{:?}", client);
        assert!(!debug.contains("omni_sk_test_key"));
    }
}
