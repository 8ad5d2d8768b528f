//! Omni HTTP Client module
//!
//! This module contains the OmniClient transport core and the unified Omni handle.

mod omni_client;
pub(crate) use omni_client::API_KEY_HEADER;
pub use omni_client::{OmniClient, OmniClientBuilder, API_PREFIX};

mod omni;
pub use omni::Omni;

mod builder;
pub use builder::OmniBuilder;
