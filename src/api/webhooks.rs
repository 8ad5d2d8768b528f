//! Webhook Source API
//!
//! Manages registered webhook sources and triggers custom events.
//! Receiving inbound webhooks is the server's job, not the client's.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{segment, DataEnvelope, ItemsEnvelope, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// A webhook source
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Header name -> whether it must be present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_headers: Option<HashMap<String, bool>>,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookSourceParams {
    /// Unique source name (e.g., "github", "stripe")
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_headers: Option<HashMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl CreateWebhookSourceParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update; only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookSourceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_headers: Option<HashMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Body for triggering a custom event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEventParams {
    pub event_type: String,
    pub payload: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

impl TriggerEventParams {
    pub fn new(event_type: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            correlation_id: None,
            instance_id: None,
        }
    }
}

/// Result of triggering an event
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResult {
    pub event_id: String,
    pub event_type: String,
}

/// Webhook API
pub struct WebhooksApi {
    context: Arc<OmniContext>,
}

impl WebhooksApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// GET /webhook-sources
    pub async fn list_sources(
        &self,
        enabled: Option<bool>,
    ) -> Result<Vec<WebhookSource>, OmniError> {
        let query = QueryBuilder::new().opt("enabled", enabled).build();
        let body = self.context.client.get("/webhook-sources", &query).await?;
        let envelope: ItemsEnvelope<WebhookSource> = self.decode(&body)?;
        Ok(envelope.items)
    }

    /// GET /webhook-sources/:id
    pub async fn get_source(&self, id: &str) -> Result<WebhookSource, OmniError> {
        let path = format!("/webhook-sources/{}", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<WebhookSource> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// POST /webhook-sources
    pub async fn create_source(
        &self,
        params: &CreateWebhookSourceParams,
    ) -> Result<WebhookSource, OmniError> {
        let body = self.context.client.post("/webhook-sources", params).await?;
        let envelope: DataEnvelope<WebhookSource> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// PATCH /webhook-sources/:id
    pub async fn update_source(
        &self,
        id: &str,
        params: &UpdateWebhookSourceParams,
    ) -> Result<WebhookSource, OmniError> {
        let path = format!("/webhook-sources/{}", segment(id));
        let body = self.context.client.patch(&path, params).await?;
        let envelope: DataEnvelope<WebhookSource> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// DELETE /webhook-sources/:id
    pub async fn delete_source(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/webhook-sources/{}", segment(id));
        self.context.client.delete(&path).await
    }

    /// Trigger a custom event
    ///
    /// POST /events/trigger. The result comes back without an envelope.
    pub async fn trigger(&self, params: &TriggerEventParams) -> Result<TriggerResult, OmniError> {
        let body = self.context.client.post("/events/trigger", params).await?;
        self.decode(&body)
    }
}

impl OmniApi for WebhooksApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "webhooks"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_webhook_source_parse() {
        let json = r#"{
            "id": "ws1",
            "name": "github",
            "expectedHeaders": {"x-hub-signature-256": true},
            "enabled": true,
            "createdAt": "2025-01-01",
            "updatedAt": "2025-01-01"
        }"#;
        let source: WebhookSource = serde_json::from_str(json).unwrap();

        assert_eq!(source.name, "github");
        assert_eq!(source.description, None);
        assert_eq!(
            source.expected_headers.unwrap().get("x-hub-signature-256"),
            Some(&true)
        );
    }

    #[test]
    fn test_trigger_params_serialization() {
        let mut payload = Map::new();
        payload.insert("orderId".into(), json!(42));
        let mut params = TriggerEventParams::new("custom.order.paid", payload);
        params.correlation_id = Some("corr-1".into());

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "eventType": "custom.order.paid",
                "payload": {"orderId": 42},
                "correlationId": "corr-1"
            })
        );
    }

    #[test]
    fn test_update_source_sends_only_set_fields() {
        let params = UpdateWebhookSourceParams {
            enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({"enabled": false}));
    }

    #[test]
    fn test_create_source_serialization() {
        let params = CreateWebhookSourceParams {
            enabled: Some(false),
            ..CreateWebhookSourceParams::new("stripe")
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"name": "stripe", "enabled": false})
        );
    }
}
