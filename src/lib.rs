//! Omni SDK for Rust
//!
//! A typed async client for the Omni v2 messaging platform API. Every call
//! is one HTTP round trip against `<base_url>/api/v2`, authenticated with
//! the `x-api-key` header.
//!
//! ## API Coverage
//!
//! | Group | Accessor | Operations |
//! |-------|----------|------------|
//! | Instances | [`Omni::instances`] | list, get, create, update, delete, status, qr, connect, disconnect, restart, logout, pair |
//! | Messages | [`Omni::messages`] | send, send_media, send_reaction, send_location |
//! | Events | [`Omni::events`] | list |
//! | Persons | [`Omni::persons`] | search, get, presence |
//! | Access | [`Omni::access`] | list_rules, get_rule, create_rule, update_rule, delete_rule, check |
//! | Automations | [`Omni::automations`] | list, get, create, update, delete, enable, disable |
//! | Webhooks | [`Omni::webhooks`] | list_sources, get_source, create_source, update_source, delete_source, trigger |
//! | Providers | [`Omni::providers`] | list, get, create, update, delete, check_health |
//! | System | [`Omni::system`] | health, info |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use omni_sdk::{api::messages::SendMessageParams, Omni};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let omni = Omni::new("http://localhost:8882", "omni_sk_your_key")?;
//!
//!     let page = omni.instances().list(None).await?;
//!     println!("{} instances, more: {}", page.len(), page.meta.has_more);
//!
//!     let sent = omni
//!         .messages()
//!         .send(&SendMessageParams::new("instance-id", "+15551234567", "Hello!"))
//!         .await?;
//!     println!("Message {} is {}", sent.message_id, sent.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Resource groups, entities and parameter types
//! - [`client`] - Transport core and the [`Omni`] handle
//! - [`error`] - Error types
//! - [`middleware`] - Tower middleware (request logging)
//! - [`types`] - Credential types
//!
//! ## Error Handling
//!
//! Every operation returns [`OmniError`]:
//!
//! ```rust,ignore
//! use omni_sdk::OmniError;
//!
//! match omni.instances().get("missing").await {
//!     Ok(instance) => println!("{}", instance.name),
//!     Err(OmniError::Api(e)) if e.status == 404 => eprintln!("no such instance"),
//!     Err(OmniError::Api(e)) => eprintln!("API error: {}", e),
//!     Err(e) if e.is_timeout() => eprintln!("timed out"),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod middleware;
pub mod types;

pub use client::{Omni, OmniBuilder, OmniClient, OmniClientBuilder};
pub use error::{ApiError, OmniError};
