//! Middleware components for the Omni client.
//!
//! Every request the client sends runs through a Tower [`Service`] stack,
//! so cross-cutting concerns can be layered on with [`ServiceBuilder`] or
//! passed to [`OmniBuilder::with_middleware`](crate::OmniBuilder::with_middleware).
//!
//! ## Middleware Types
//!
//! - [`LoggingMiddleware`] - Logs request/response information with the API key redacted
//!
//! ## Usage
//!
//! ```no_run
//! use omni_sdk::{middleware::LoggingMiddleware, types::ApiKey, Omni};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let omni = Omni::builder()
//!     .base_url("http://localhost:8882")
//!     .api_key(ApiKey::new("omni_sk_...")?)
//!     .with_middleware(LoggingMiddleware::new())
//!     .build()?;
//! # let _ = omni;
//! # Ok(())
//! # }
//! ```

// Re-export tower types for convenience
pub use tower::{Layer, Service, ServiceBuilder};

mod logging;

pub use logging::{LoggingMiddleware, LoggingMiddlewareService};
