use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Request as ReqwestRequest, Response as ReqwestResponse};
use tower::{Layer, Service};

use crate::api::OmniContext;
use crate::error::OmniError;
use crate::types::ApiKey;

use super::omni_client::{MiddlewareExecutor, OmniClient};
use super::Omni;

type MiddlewareFuture =
    Pin<Box<dyn Future<Output = Result<ReqwestResponse, reqwest::Error>> + Send>>;

#[must_use]
#[derive(Default)]
pub struct OmniBuilder<M = ()> {
    base_url: Option<String>,
    api_key: Option<ApiKey>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    middleware: Option<M>,
}

impl<M> std::fmt::Debug for OmniBuilder<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmniBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("middleware", &self.middleware.as_ref().map(|_| ".."))
            .finish()
    }
}

impl<M> OmniBuilder<M> {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_middleware<M2>(self, middleware: M2) -> OmniBuilder<M2>
    where
        M2: Layer<OmniClient> + Clone + Send + Sync + 'static,
    {
        OmniBuilder {
            base_url: self.base_url,
            api_key: self.api_key,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            middleware: Some(middleware),
        }
    }

    fn build_client(self) -> Result<(OmniClient, Option<M>), OmniError> {
        let mut builder = OmniClient::builder();
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(key) = self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok((builder.build()?, self.middleware))
    }

    pub fn build(self) -> Result<Omni, OmniError>
    where
        M: Layer<OmniClient> + Clone + Send + Sync + 'static,
        M::Service: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <M::Service as Service<ReqwestRequest>>::Future: Send + 'static,
    {
        let (mut client, middleware) = self.build_client()?;

        if let Some(middleware) = middleware {
            let service = middleware.layer(client.clone());
            let executor = make_middleware_executor(service);
            client = client.with_middleware_executor(executor);
        }

        let context = Arc::new(OmniContext::new(Arc::new(client)));

        Ok(Omni::from(context))
    }
}

fn make_middleware_executor<S>(service: S) -> MiddlewareExecutor
where
    S: Service<ReqwestRequest, Response = ReqwestResponse, Error = reqwest::Error>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let service = Arc::new(service);

    Arc::new(move |request: ReqwestRequest| -> MiddlewareFuture {
        let mut service = (*service).clone();
        Box::pin(async move { service.call(request).await })
    })
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use tower::{Layer, Service};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_key() -> ApiKey {
        ApiKey::new("omni_sk_test_key").unwrap()
    }

    #[test]
    fn test_builder_values() {
        let omni = Omni::builder()
            .base_url("https://omni.example.com/")
            .api_key(test_key())
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(omni.base_url(), "https://omni.example.com");
    }

    #[test]
    fn test_missing_api_key() {
        let result = Omni::builder().base_url("http://localhost:8882").build();

        assert!(matches!(result, Err(OmniError::Config(_))));
    }

    #[test]
    fn test_missing_base_url() {
        let result = Omni::builder().api_key(test_key()).build();

        assert!(matches!(result, Err(OmniError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let builder = Omni::builder()
            .base_url("http://localhost:8882")
            .api_key(test_key());

        let debug = format!("{:?}", builder);
        assert!(debug.contains("localhost:8882"));
        assert!(!debug.contains("omni_sk_test_key"));
    }

    #[tokio::test]
    async fn test_middleware_configured_and_executes() {
        #[derive(Clone)]
        struct FlagLayer {
            flag: Arc<AtomicBool>,
        }

        impl Layer<OmniClient> for FlagLayer {
            type Service = FlagService;

            fn layer(&self, inner: OmniClient) -> Self::Service {
                FlagService {
                    inner,
                    flag: Arc::clone(&self.flag),
                }
            }
        }

        #[derive(Clone)]
        struct FlagService {
            inner: OmniClient,
            flag: Arc<AtomicBool>,
        }

        impl Service<ReqwestRequest> for FlagService {
            type Response = ReqwestResponse;
            type Error = reqwest::Error;
            type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

            fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
                Poll::Ready(Ok(()))
            }

            fn call(&mut self, req: ReqwestRequest) -> Self::Future {
                self.flag.store(true, Ordering::SeqCst);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
        }

        let middleware_invoked = Arc::new(AtomicBool::new(false));
        let layer = FlagLayer {
            flag: Arc::clone(&middleware_invoked),
        };

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/health"))
            .and(header("x-api-key", "omni_sk_test_key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "healthy"})),
            )
            .mount(&mock_server)
            .await;

        let omni = Omni::builder()
            .base_url(mock_server.uri())
            .api_key(test_key())
            .with_middleware(layer)
            .build()
            .unwrap();

        let health = omni.system().health().await.unwrap();

        assert_eq!(health.status, "healthy");
        assert!(middleware_invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_builder_with_logging_middleware_builds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "healthy"})),
            )
            .mount(&mock_server)
            .await;

        let omni = Omni::builder()
            .base_url(mock_server.uri())
            .api_key(test_key())
            .with_middleware(crate::middleware::LoggingMiddleware::new())
            .build()
            .unwrap();

        let result = omni.system().health().await;
        assert!(result.is_ok());
    }
}
