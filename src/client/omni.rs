//! Unified Omni client

use std::sync::Arc;

use crate::api::access::AccessApi;
use crate::api::automations::AutomationsApi;
use crate::api::events::EventsApi;
use crate::api::instances::InstancesApi;
use crate::api::messages::MessagesApi;
use crate::api::persons::PersonsApi;
use crate::api::providers::ProvidersApi;
use crate::api::system::SystemApi;
use crate::api::webhooks::WebhooksApi;
use crate::api::OmniContext;
use crate::error::OmniError;
use crate::types::ApiKey;

use super::OmniClient;

/// Unified Omni client
///
/// This is the main entry point for the SDK. Each resource group is reached
/// through an accessor that borrows the shared, immutable configuration.
///
/// # Example
///
/// ```rust,ignore
/// use omni_sdk::Omni;
/// use omni_sdk::api::messages::SendMessageParams;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let omni = Omni::new("http://localhost:8882", "omni_sk_your_key")?;
///
///     let instances = omni.instances().list(None).await?;
///     for inst in &instances.items {
///         println!("{}: {}", inst.name, inst.channel);
///     }
///
///     let result = omni
///         .messages()
///         .send(&SendMessageParams::new("instance-id", "chat-id", "Hello from Rust!"))
///         .await?;
///     println!("queued {}", result.message_id);
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Omni {
    context: Arc<OmniContext>,
}

impl Omni {
    pub fn builder() -> super::builder::OmniBuilder {
        super::builder::OmniBuilder::default()
    }

    /// Build a client with default timeouts
    ///
    /// # Errors
    /// Returns `OmniError::Config` for an empty key or a non-http(s) base URL
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, OmniError> {
        let api_key = ApiKey::new(api_key).map_err(OmniError::Config)?;
        Self::builder().base_url(base_url).api_key(api_key).build()
    }

    pub fn base_url(&self) -> &str {
        self.context.client().base_url()
    }

    /// Transport core shared by every resource API
    pub fn client(&self) -> &OmniClient {
        self.context.client()
    }

    pub fn instances(&self) -> InstancesApi {
        InstancesApi::new(self.context.clone())
    }

    pub fn messages(&self) -> MessagesApi {
        MessagesApi::new(self.context.clone())
    }

    pub fn events(&self) -> EventsApi {
        EventsApi::new(self.context.clone())
    }

    pub fn persons(&self) -> PersonsApi {
        PersonsApi::new(self.context.clone())
    }

    pub fn access(&self) -> AccessApi {
        AccessApi::new(self.context.clone())
    }

    pub fn automations(&self) -> AutomationsApi {
        AutomationsApi::new(self.context.clone())
    }

    pub fn webhooks(&self) -> WebhooksApi {
        WebhooksApi::new(self.context.clone())
    }

    pub fn providers(&self) -> ProvidersApi {
        ProvidersApi::new(self.context.clone())
    }

    pub fn system(&self) -> SystemApi {
        SystemApi::new(self.context.clone())
    }
}

impl From<Arc<OmniContext>> for Omni {
    fn from(context: Arc<OmniContext>) -> Self {
        Self { context }
    }
}
