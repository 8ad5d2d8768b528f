//! Agent Provider API
//!
//! Providers are the AI backends instances route conversations to.
//! API keys are write-only: the server masks them in every response.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{segment, DataEnvelope, ItemsEnvelope, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// An agent provider
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    /// Provider schema (e.g., "agno", "openai", "anthropic", "custom")
    pub schema: String,
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_config: Option<Map<String, Value>>,
    pub default_stream: bool,
    /// Seconds
    pub default_timeout: i32,
    #[serde(alias = "active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for creating a provider
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderParams {
    pub name: String,
    /// Server defaults to "agno"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_documents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CreateProviderParams {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Partial provider update; only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports_documents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Result of a provider health check
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderHealth {
    pub healthy: bool,
    /// Milliseconds
    pub latency: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Provider API
pub struct ProvidersApi {
    context: Arc<OmniContext>,
}

impl ProvidersApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// GET /providers
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<Provider>, OmniError> {
        let query = QueryBuilder::new().opt("active", active).build();
        let body = self.context.client.get("/providers", &query).await?;
        let envelope: ItemsEnvelope<Provider> = self.decode(&body)?;
        Ok(envelope.items)
    }

    /// GET /providers/:id
    pub async fn get(&self, id: &str) -> Result<Provider, OmniError> {
        let path = format!("/providers/{}", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<Provider> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// POST /providers
    pub async fn create(&self, params: &CreateProviderParams) -> Result<Provider, OmniError> {
        let body = self.context.client.post("/providers", params).await?;
        let envelope: DataEnvelope<Provider> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// PATCH /providers/:id
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateProviderParams,
    ) -> Result<Provider, OmniError> {
        let path = format!("/providers/{}", segment(id));
        let body = self.context.client.patch(&path, params).await?;
        let envelope: DataEnvelope<Provider> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// DELETE /providers/:id
    pub async fn delete(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/providers/{}", segment(id));
        self.context.client.delete(&path).await
    }

    /// Probe the provider's upstream
    ///
    /// POST /providers/:id/health. An unhealthy provider is still a
    /// successful call; inspect [`ProviderHealth::healthy`].
    pub async fn check_health(&self, id: &str) -> Result<ProviderHealth, OmniError> {
        let path = format!("/providers/{}/health", segment(id));
        let body = self.context.client.post_empty(&path).await?;
        self.decode(&body)
    }
}

impl OmniApi for ProvidersApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "providers"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_parse() {
        let json = r#"{
            "id": "p1",
            "name": "agno-main",
            "schema": "agno",
            "baseUrl": "http://agno:8000",
            "apiKey": "********",
            "defaultStream": true,
            "defaultTimeout": 60,
            "isActive": true,
            "tags": ["prod"],
            "createdAt": "2025-01-01",
            "updatedAt": "2025-01-01"
        }"#;
        let provider: Provider = serde_json::from_str(json).unwrap();

        assert_eq!(provider.schema, "agno");
        assert_eq!(provider.default_timeout, 60);
        assert!(provider.is_active);
        assert_eq!(provider.tags.unwrap(), vec!["prod".to_string()]);
        assert!(provider.schema_config.is_none());
    }

    #[test]
    fn test_provider_parse_legacy_active_key() {
        let json = r#"{
            "id": "p1", "name": "n", "schema": "custom", "baseUrl": "http://x",
            "defaultStream": false, "defaultTimeout": 10, "active": false,
            "createdAt": "c", "updatedAt": "u"
        }"#;
        let provider: Provider = serde_json::from_str(json).unwrap();
        assert!(!provider.is_active);
    }

    #[test]
    fn test_health_parse_with_error() {
        let health: ProviderHealth =
            serde_json::from_str(r#"{"healthy": false, "latency": 1200, "error": "timeout"}"#)
                .unwrap();
        assert!(!health.healthy);
        assert_eq!(health.latency, 1200);
        assert_eq!(health.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_update_params_omit_unset_fields() {
        let params = UpdateProviderParams {
            default_stream: Some(false),
            tags: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"defaultStream": false, "tags": []})
        );
    }

    #[test]
    fn test_create_params_serialization() {
        let params = CreateProviderParams {
            api_key: Some("secret".into()),
            default_timeout: Some(30),
            ..CreateProviderParams::new("agno-main", "http://agno:8000")
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "name": "agno-main",
                "baseUrl": "http://agno:8000",
                "apiKey": "secret",
                "defaultTimeout": 30
            })
        );
    }
}
