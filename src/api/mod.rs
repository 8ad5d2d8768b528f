//! Omni v2 API modules
//!
//! One submodule per resource group, each exposing an `*Api` handle plus
//! the entity and parameter types its endpoints use:
//!
//! - [`common`] - Envelopes and cursor pagination shared by every group
//! - [`instances`] - Channel instance lifecycle, status and QR pairing
//! - [`messages`] - Text, media, reaction and location sends
//! - [`events`] - Event log queries
//! - [`persons`] - Person search and lookup
//! - [`access`] - Allow/deny rules and access checks
//! - [`automations`] - Event-driven automations
//! - [`webhooks`] - Webhook sources and custom event triggers
//! - [`providers`] - Agent providers and their health
//! - [`system`] - Server health
//!
//! ## Usage
//!
//! ```rust,ignore
//! use omni_sdk::Omni;
//!
//! let omni = Omni::new("http://localhost:8882", "omni_sk_...")?;
//! let page = omni.events().list(None).await?;
//! ```

pub mod access;
pub mod automations;
pub mod common;
pub mod events;
pub mod instances;
pub mod messages;
pub mod persons;
pub mod providers;
pub mod system;
pub mod r#trait;
pub mod webhooks;

pub use access::{
    AccessApi, AccessRule, CheckAccessResult, CreateAccessRuleParams, ListAccessRulesParams,
    RuleAction, RuleType, UpdateAccessRuleParams,
};
pub use automations::{
    Automation, AutomationsApi, CreateAutomationParams, UpdateAutomationParams,
};
pub use common::{DataEnvelope, ItemsEnvelope, Paginated, PaginationMeta};
pub use events::{Event, EventsApi, ListEventsParams};
pub use instances::{
    ConnectResult, CreateInstanceParams, Instance, InstanceStatus, InstancesApi,
    ListInstancesParams, PairingCode, QrCode, RestartResult, UpdateInstanceParams,
};
pub use messages::{
    MediaKind, MessagesApi, SendLocationParams, SendMediaParams, SendMessageParams,
    SendReactionParams, SendResult,
};
pub use persons::{
    ChannelPresence, Person, PersonPresence, PersonsApi, PlatformIdentity, PresenceSummary,
};
pub use providers::{
    CreateProviderParams, Provider, ProviderHealth, ProvidersApi, UpdateProviderParams,
};
pub use r#trait::{OmniApi, OmniContext};
pub use system::{EventCounts, HealthCheck, HealthStatus, InstanceCounts, SystemApi, SystemInfo};
pub use webhooks::{
    CreateWebhookSourceParams, TriggerEventParams, TriggerResult, UpdateWebhookSourceParams,
    WebhookSource, WebhooksApi,
};
