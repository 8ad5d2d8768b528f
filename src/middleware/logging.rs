use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use http::HeaderMap;
use log::{debug, info};
use reqwest::{Request, Response};
use tower::{Layer, Service};

use crate::client::API_KEY_HEADER;

const REDACTED: &str = "[REDACTED]";

/// Logs each request line and its status/latency.
///
/// The API key header and credential-looking query parameters are never
/// written to the log.
#[derive(Clone, Debug)]
pub struct LoggingMiddleware {
    verbose: bool,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Log at `debug!` and include request headers
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LoggingMiddleware
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Service = LoggingMiddlewareService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddlewareService {
            inner,
            verbose: self.verbose,
        }
    }
}

#[derive(Clone)]
pub struct LoggingMiddlewareService<S> {
    inner: S,
    verbose: bool,
}

const SENSITIVE_QUERY_KEYS: &[&str] = &["api_key", "apikey", "key", "token", "password", "secret"];

fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let redacted_query = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some((key, _))
                if SENSITIVE_QUERY_KEYS
                    .iter()
                    .any(|s| key.eq_ignore_ascii_case(s)) =>
            {
                format!("{}={}", key, REDACTED)
            }
            _ => param.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, redacted_query)
}

fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if name == API_KEY_HEADER || name == http::header::AUTHORIZATION {
                REDACTED
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}: {}", name, shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_request(method: &str, url: &str, headers: &HeaderMap, verbose: bool) {
    let safe_url = redact_url(url);
    if verbose {
        debug!(
            "[Omni] >>> {} {} [{}]",
            method,
            safe_url,
            render_headers(headers)
        );
    } else {
        info!("[Omni] {} {}", method, safe_url);
    }
}

fn log_response(status: http::StatusCode, duration: Duration, verbose: bool) {
    if verbose {
        debug!(
            "[Omni] <<< {} {} ({:?})",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration
        );
    } else {
        info!("[Omni] {} ({:?})", status.as_u16(), duration);
    }
}

impl<S, Error> Service<Request> for LoggingMiddlewareService<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + Clone + 'static,
    S::Future: Send,
    Error: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let verbose = self.verbose;
        log_request(req.method().as_str(), req.url().as_str(), req.headers(), verbose);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let start = Instant::now();
            let response = inner.call(req).await?;
            log_response(response.status(), start.elapsed(), verbose);
            Ok(response)
        })
    }
}
