//! Automation Management API
//!
//! An automation maps a triggering event type plus conditions to a sequence
//! of actions. Evaluation happens server-side; conditions and actions are
//! carried as free-form JSON objects.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{segment, DataEnvelope, ItemsEnvelope, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// An automation
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub trigger_event_type: String,
    /// `{field, operator, value}` objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_conditions: Option<Vec<Map<String, Value>>>,
    /// "and" / "or"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_logic: Option<String>,
    /// `{type, config}` objects executed in order
    pub actions: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce: Option<Value>,
    pub enabled: bool,
    pub priority: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for creating an automation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAutomationParams {
    pub name: String,
    pub trigger_event_type: String,
    /// At least one action is required by the server
    pub actions: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_conditions: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_logic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl CreateAutomationParams {
    pub fn new(
        name: impl Into<String>,
        trigger_event_type: impl Into<String>,
        actions: Vec<Map<String, Value>>,
    ) -> Self {
        Self {
            name: name.into(),
            trigger_event_type: trigger_event_type.into(),
            actions,
            ..Default::default()
        }
    }
}

/// Partial automation update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAutomationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_conditions: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_logic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Automation API
pub struct AutomationsApi {
    context: Arc<OmniContext>,
}

impl AutomationsApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// GET /automations
    pub async fn list(&self, enabled: Option<bool>) -> Result<Vec<Automation>, OmniError> {
        let query = QueryBuilder::new().opt("enabled", enabled).build();
        let body = self.context.client.get("/automations", &query).await?;
        let envelope: ItemsEnvelope<Automation> = self.decode(&body)?;
        Ok(envelope.items)
    }

    /// GET /automations/:id
    pub async fn get(&self, id: &str) -> Result<Automation, OmniError> {
        let path = format!("/automations/{}", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        self.unwrap_data(&body)
    }

    /// POST /automations
    pub async fn create(&self, params: &CreateAutomationParams) -> Result<Automation, OmniError> {
        let body = self.context.client.post("/automations", params).await?;
        self.unwrap_data(&body)
    }

    /// PATCH /automations/:id
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateAutomationParams,
    ) -> Result<Automation, OmniError> {
        let path = format!("/automations/{}", segment(id));
        let body = self.context.client.patch(&path, params).await?;
        self.unwrap_data(&body)
    }

    /// DELETE /automations/:id
    pub async fn delete(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/automations/{}", segment(id));
        self.context.client.delete(&path).await
    }

    /// POST /automations/:id/enable
    pub async fn enable(&self, id: &str) -> Result<Automation, OmniError> {
        let path = format!("/automations/{}/enable", segment(id));
        let body = self.context.client.post_empty(&path).await?;
        self.unwrap_data(&body)
    }

    /// POST /automations/:id/disable
    pub async fn disable(&self, id: &str) -> Result<Automation, OmniError> {
        let path = format!("/automations/{}/disable", segment(id));
        let body = self.context.client.post_empty(&path).await?;
        self.unwrap_data(&body)
    }

    fn unwrap_data(&self, body: &[u8]) -> Result<Automation, OmniError> {
        let envelope: DataEnvelope<Automation> = self.decode(body)?;
        Ok(envelope.data)
    }
}

impl OmniApi for AutomationsApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "automations"
    }
}
