//! Omni API trait and context
//!
//! Provides the base trait and context for all resource API implementations.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::OmniClient;
use crate::error::OmniError;

/// Context holding shared resources for resource API implementations.
///
/// Holds the immutable transport core; cloned (by `Arc`) into every API handle.
#[derive(Clone)]
pub struct OmniContext {
    /// The Omni HTTP client for making API requests
    pub(crate) client: Arc<OmniClient>,
}

impl std::fmt::Debug for OmniContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmniContext")
            .field("client", &"OmniClient { .. }")
            .finish()
    }
}

impl OmniContext {
    /// Create a new OmniContext
    pub fn new(client: Arc<OmniClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the Omni HTTP client.
    pub fn client(&self) -> &OmniClient {
        &self.client
    }
}

/// Trait for Omni resource API implementations.
///
/// All resource groups implement this trait to provide access to the
/// shared context and a uniform success-body decoder.
pub trait OmniApi: Send + Sync {
    /// Get a reference to the Omni context
    fn context(&self) -> &OmniContext;

    /// Get the name of this API for logging and error context.
    fn api_name(&self) -> &'static str;

    /// Decode a success body into the endpoint's documented shape.
    ///
    /// # Errors
    /// Returns `OmniError::Parse` when the body does not match `T`
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, OmniError> {
        serde_json::from_slice(body).map_err(|e| {
            log::warn!("[Omni] {} response did not match expected shape: {}", self.api_name(), e);
            OmniError::Parse(e)
        })
    }
}
