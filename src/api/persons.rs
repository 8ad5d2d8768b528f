use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{segment, DataEnvelope, ItemsEnvelope, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// A person: one human identity linked across channel accounts
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// E.164
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub created_at: String,
    pub updated_at: String,
}

/// A person's account on one channel
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformIdentity {
    pub id: String,
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub platform_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_username: Option<String>,
    #[serde(default)]
    pub message_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<String>,
}

/// Cross-channel totals for one person
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSummary {
    pub total_identities: u64,
    #[serde(default)]
    pub active_channels: Vec<String>,
    pub total_messages: u64,
    #[serde(default)]
    pub last_seen_at: Option<String>,
    #[serde(default)]
    pub first_seen_at: Option<String>,
}

/// Identities grouped under one channel
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPresence {
    pub identities: Vec<PlatformIdentity>,
    pub message_count: u64,
    #[serde(default)]
    pub last_seen_at: Option<String>,
}

/// Where a person can be reached, across every linked channel account
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPresence {
    pub person: Person,
    pub identities: Vec<PlatformIdentity>,
    pub summary: PresenceSummary,
    /// Keyed by channel type
    #[serde(default)]
    pub by_channel: HashMap<String, ChannelPresence>,
}

/// Person API
pub struct PersonsApi {
    context: Arc<OmniContext>,
}

impl PersonsApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// Search persons by name, phone or platform ID
    ///
    /// GET /persons?search=...
    pub async fn search(&self, search: &str, limit: Option<u32>) -> Result<Vec<Person>, OmniError> {
        let query = QueryBuilder::new()
            .push("search", search)
            .opt("limit", limit)
            .build();
        let body = self.context.client.get("/persons", &query).await?;
        let envelope: ItemsEnvelope<Person> = self.decode(&body)?;
        Ok(envelope.items)
    }

    /// GET /persons/:id
    pub async fn get(&self, id: &str) -> Result<Person, OmniError> {
        let path = format!("/persons/{}", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<Person> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// GET /persons/:id/presence
    pub async fn presence(&self, id: &str) -> Result<PersonPresence, OmniError> {
        let path = format!("/persons/{}/presence", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<PersonPresence> = self.decode(&body)?;
        Ok(envelope.data)
    }
}

impl OmniApi for PersonsApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "persons"
    }
}
