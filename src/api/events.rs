//! Event Query API
//!
//! Read-only access to the platform event log with cursor pagination.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{Paginated, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// A platform event
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    /// Event type (e.g., "message.received"); event rows carry it as `eventType`
    #[serde(rename = "type", alias = "eventType", default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    /// "inbound" or "outbound"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    /// Processing status ("received", "processing", "completed", "failed")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
    pub created_at: String,
}

/// Filters for listing events. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListEventsParams {
    pub channel: Option<String>,
    pub instance_id: Option<String>,
    pub event_type: Option<String>,
    /// Lower time bound (ISO 8601)
    pub since: Option<String>,
    /// Upper time bound (ISO 8601)
    pub until: Option<String>,
    /// Full-text search over event content
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListEventsParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        QueryBuilder::new()
            .opt("channel", self.channel.as_ref())
            .opt("instanceId", self.instance_id.as_ref())
            .opt("eventType", self.event_type.as_ref())
            .opt("since", self.since.as_ref())
            .opt("until", self.until.as_ref())
            .opt("search", self.search.as_ref())
            .opt("limit", self.limit)
            .opt("cursor", self.cursor.as_ref())
            .build()
    }
}

/// Event API
pub struct EventsApi {
    context: Arc<OmniContext>,
}

impl EventsApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// List events
    ///
    /// GET /events
    pub async fn list(
        &self,
        params: Option<&ListEventsParams>,
    ) -> Result<Paginated<Event>, OmniError> {
        let query = params.map(ListEventsParams::to_query).unwrap_or_default();
        let body = self.context.client.get("/events", &query).await?;
        self.decode(&body)
    }
}

impl OmniApi for EventsApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "events"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parse() {
        let json = r#"{
            "id": "evt-1",
            "type": "message.received",
            "channel": "whatsapp-baileys",
            "instanceId": "inst-1",
            "payload": {"text": "hello"},
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "message.received");
        assert_eq!(event.instance_id.as_deref(), Some("inst-1"));
        assert_eq!(event.processed_at, None);
        assert_eq!(event.payload.unwrap()["text"], "hello");
    }

    #[test]
    fn test_event_row_parse() {
        let json = r#"{
            "id": "e1",
            "eventType": "message.received",
            "channel": "discord",
            "direction": "inbound",
            "textContent": "hi",
            "status": "completed",
            "receivedAt": "2025-01-01T00:00:00Z",
            "processedAt": null,
            "createdAt": "2025-01-01T00:00:01Z"
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "message.received");
        assert_eq!(event.received_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(event.direction.as_deref(), Some("inbound"));
        assert_eq!(event.text_content.as_deref(), Some("hi"));
        assert_eq!(event.processed_at, None);
        assert!(event.payload.is_none());
    }

    #[test]
    fn test_list_params_query_keys() {
        let params = ListEventsParams {
            instance_id: Some("inst-1".into()),
            event_type: Some("message.sent".into()),
            since: Some("2025-01-01T00:00:00Z".into()),
            cursor: Some("abc".into()),
            ..Default::default()
        };

        let query = params.to_query();
        assert_eq!(query.len(), 4);
        assert!(query.contains(&("instanceId", "inst-1".to_string())));
        assert!(query.contains(&("eventType", "message.sent".to_string())));
        assert!(query.contains(&("since", "2025-01-01T00:00:00Z".to_string())));
        assert!(query.contains(&("cursor", "abc".to_string())));
    }

    #[test]
    fn test_list_params_default_is_empty() {
        assert!(ListEventsParams::default().to_query().is_empty());
    }
}
