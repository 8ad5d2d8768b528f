//! Instance Management API
//!
//! An instance is one configured channel connection (a WhatsApp session,
//! a Discord bot, ...) managed by the Omni platform.
//!
//! # Features
//!
//! - List instances with channel/status filters and cursor pagination
//! - Create, update and delete instances
//! - Connection lifecycle: status, QR code, pairing code, connect,
//!   disconnect, restart, logout
//!
//! # Example
//!
//! ```no_run
//! # use omni_sdk::Omni;
//! # use omni_sdk::api::instances::ListInstancesParams;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let omni = Omni::new("http://localhost:8882", "omni_sk_your_key")?;
//!
//! let mut params = ListInstancesParams {
//!     channel: Some("whatsapp-baileys".to_string()),
//!     ..Default::default()
//! };
//! loop {
//!     let page = omni.instances().list(Some(&params)).await?;
//!     for inst in &page.items {
//!         println!("{} active={:?}", inst.name, inst.is_active);
//!     }
//!     match page.meta.next_cursor() {
//!         Some(cursor) => params.cursor = Some(cursor.to_string()),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{segment, DataEnvelope, Paginated, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

// ============================================================================
// Types
// ============================================================================

/// A channel instance
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    pub name: String,
    /// Channel type (e.g., "whatsapp-baileys", "discord")
    pub channel: String,
    /// Empty when the server only reports [`Instance::is_active`]
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(
        default,
        alias = "profilePicUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_avatar_url: Option<String>,
    /// Channel account of the instance (WhatsApp JID, Discord user ID, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_identifier: Option<String>,
    /// Channel-specific settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    pub created_at: String,
    pub updated_at: String,
}

/// Filters for listing instances. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct ListInstancesParams {
    /// Channel type; the server accepts a comma-separated list
    pub channel: Option<String>,
    /// "active" / "inactive"; the server accepts a comma-separated list
    pub status: Option<String>,
    pub limit: Option<u32>,
    /// Cursor from a previous page's [`PaginationMeta`](super::common::PaginationMeta)
    pub cursor: Option<String>,
}

impl ListInstancesParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        QueryBuilder::new()
            .opt("channel", self.channel.as_ref())
            .opt("status", self.status.as_ref())
            .opt("limit", self.limit)
            .opt("cursor", self.cursor.as_ref())
            .build()
    }
}

/// Body for creating an instance
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceParams {
    pub name: String,
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Agent timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_stream_mode: Option<bool>,
    /// Make this the default instance for its channel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

impl CreateInstanceParams {
    pub fn new(name: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
            ..Default::default()
        }
    }
}

/// Partial update; only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstanceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_stream_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Connection status of an instance
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub state: String,
    pub is_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_identifier: Option<String>,
    /// Detail from the channel plugin, e.g. why the state is "error"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// QR code for pairing a WhatsApp instance
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    /// QR payload; absent once the instance is paired or before one is issued
    #[serde(default)]
    pub qr: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    pub message: String,
}

/// Result of a connect action
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectResult {
    pub status: String,
    pub message: String,
}

/// Result of a restart action
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartResult {
    pub instance_id: String,
    pub status: String,
    pub message: String,
}

/// Phone pairing code for a WhatsApp instance
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingCode {
    pub code: String,
    /// Masked by the server (e.g., "5511****99")
    pub phone_number: String,
    pub message: String,
    /// Seconds
    pub expires_in: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PairRequest<'a> {
    phone_number: &'a str,
}

// ============================================================================
// InstancesApi
// ============================================================================

/// Instance API
pub struct InstancesApi {
    context: Arc<OmniContext>,
}

impl InstancesApi {
    /// Create a new InstancesApi instance
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// List instances
    ///
    /// GET /instances
    ///
    /// Returns one page; follow `meta.cursor` manually for the next one.
    pub async fn list(
        &self,
        params: Option<&ListInstancesParams>,
    ) -> Result<Paginated<Instance>, OmniError> {
        let query = params.map(ListInstancesParams::to_query).unwrap_or_default();
        let body = self.context.client.get("/instances", &query).await?;
        self.decode(&body)
    }

    /// Get an instance by ID
    ///
    /// GET /instances/:id
    pub async fn get(&self, id: &str) -> Result<Instance, OmniError> {
        let path = format!("/instances/{}", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<Instance> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Create an instance
    ///
    /// POST /instances
    pub async fn create(&self, params: &CreateInstanceParams) -> Result<Instance, OmniError> {
        let body = self.context.client.post("/instances", params).await?;
        let envelope: DataEnvelope<Instance> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Update an instance
    ///
    /// PATCH /instances/:id
    pub async fn update(
        &self,
        id: &str,
        params: &UpdateInstanceParams,
    ) -> Result<Instance, OmniError> {
        let path = format!("/instances/{}", segment(id));
        let body = self.context.client.patch(&path, params).await?;
        let envelope: DataEnvelope<Instance> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Delete an instance
    ///
    /// DELETE /instances/:id
    pub async fn delete(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/instances/{}", segment(id));
        self.context.client.delete(&path).await
    }

    /// Get the connection status of an instance
    ///
    /// GET /instances/:id/status
    pub async fn status(&self, id: &str) -> Result<InstanceStatus, OmniError> {
        let path = format!("/instances/{}/status", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<InstanceStatus> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Get the pairing QR code of a WhatsApp instance
    ///
    /// GET /instances/:id/qr
    pub async fn qr(&self, id: &str) -> Result<QrCode, OmniError> {
        let path = format!("/instances/{}/qr", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<QrCode> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Connect an instance
    ///
    /// POST /instances/:id/connect with an empty JSON object body
    pub async fn connect(&self, id: &str) -> Result<ConnectResult, OmniError> {
        let path = format!("/instances/{}/connect", segment(id));
        let body = self
            .context
            .client
            .post(&path, &Map::<String, Value>::new())
            .await?;
        let envelope: DataEnvelope<ConnectResult> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Disconnect an instance
    ///
    /// POST /instances/:id/disconnect with no body
    pub async fn disconnect(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/instances/{}/disconnect", segment(id));
        self.context.client.post_empty(&path).await?;
        Ok(())
    }

    /// Restart an instance (disconnect, then connect)
    ///
    /// POST /instances/:id/restart. With `force_new_qr` the stored session
    /// is cleared and a fresh QR code is issued.
    pub async fn restart(
        &self,
        id: &str,
        force_new_qr: bool,
    ) -> Result<RestartResult, OmniError> {
        let path = format!("/instances/{}/restart", segment(id));
        let query = QueryBuilder::new()
            .opt("forceNewQr", force_new_qr.then_some(true))
            .build();
        let body = self
            .context
            .client
            .request::<()>(Method::POST, &path, &query, None)
            .await?;
        let envelope: DataEnvelope<RestartResult> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// Log an instance out; the next connect needs re-authentication
    ///
    /// POST /instances/:id/logout
    pub async fn logout(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/instances/{}/logout", segment(id));
        self.context.client.post_empty(&path).await?;
        Ok(())
    }

    /// Request a phone pairing code, the alternative to scanning a QR code
    ///
    /// POST /instances/:id/pair. WhatsApp only; the instance must be connecting.
    pub async fn pair(&self, id: &str, phone_number: &str) -> Result<PairingCode, OmniError> {
        let path = format!("/instances/{}/pair", segment(id));
        let request = PairRequest { phone_number };
        let body = self.context.client.post(&path, &request).await?;
        let envelope: DataEnvelope<PairingCode> = self.decode(&body)?;
        Ok(envelope.data)
    }
}

impl OmniApi for InstancesApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "instances"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_parse_full() {
        let json = r#"{
            "id": "inst-1",
            "name": "support",
            "channel": "whatsapp-baileys",
            "status": "active",
            "agentProviderId": "prov-1",
            "agentId": "default",
            "profileName": "Support Bot",
            "profileAvatarUrl": "https://example.com/a.png",
            "settings": {"autoRead": true},
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }"#;

        let inst: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.id, "inst-1");
        assert_eq!(inst.channel, "whatsapp-baileys");
        assert_eq!(inst.agent_provider_id.as_deref(), Some("prov-1"));
        assert_eq!(inst.profile_name.as_deref(), Some("Support Bot"));
        assert_eq!(
            inst.settings.unwrap().get("autoRead"),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_instance_parse_optional_fields_absent() {
        let json = r#"{
            "id": "inst-2",
            "name": "discord",
            "channel": "discord",
            "status": "inactive",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }"#;

        let inst: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.agent_provider_id, None);
        assert_eq!(inst.agent_id, None);
        assert_eq!(inst.profile_avatar_url, None);
        assert!(inst.settings.is_none());
    }

    #[test]
    fn test_list_params_query_only_supplied() {
        assert!(ListInstancesParams::default().to_query().is_empty());

        let params = ListInstancesParams {
            status: Some("active".into()),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            vec![("status", "active".to_string()), ("limit", "10".to_string())]
        );
    }

    #[test]
    fn test_create_params_omit_unset_fields() {
        let params = CreateInstanceParams::new("support", "discord");
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "support", "channel": "discord"})
        );
    }

    #[test]
    fn test_update_params_send_explicit_false() {
        let params = UpdateInstanceParams {
            is_default: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, serde_json::json!({"isDefault": false}));
    }

    #[test]
    fn test_qr_code_parse_null_qr() {
        let json = r#"{"qr": null, "expiresAt": null, "message": "Already connected"}"#;
        let qr: QrCode = serde_json::from_str(json).unwrap();
        assert_eq!(qr.qr, None);
        assert_eq!(qr.message, "Already connected");
    }

    #[test]
    fn test_instance_status_parse() {
        let json = r#"{"state": "connected", "isConnected": true}"#;
        let status: InstanceStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.state, "connected");
        assert!(status.is_connected);
        assert_eq!(status.profile_name, None);
        assert_eq!(status.instance_id, None);
    }

    #[test]
    fn test_instance_row_without_status_parses() {
        let json = r#"{
            "id": "i1",
            "name": "n",
            "channel": "discord",
            "isActive": true,
            "isDefault": false,
            "agentId": "default",
            "profilePicUrl": "https://cdn.example.com/p.png",
            "ownerIdentifier": "1234",
            "createdAt": "c",
            "updatedAt": "u"
        }"#;

        let inst: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.status, "");
        assert_eq!(inst.is_active, Some(true));
        assert_eq!(inst.is_default, Some(false));
        assert_eq!(
            inst.profile_avatar_url.as_deref(),
            Some("https://cdn.example.com/p.png")
        );
        assert_eq!(inst.owner_identifier.as_deref(), Some("1234"));
    }

    #[test]
    fn test_instance_status_parse_plugin_detail() {
        let json = r#"{
            "instanceId": "i1",
            "state": "error",
            "isConnected": false,
            "connectedAt": null,
            "profileName": null,
            "ownerIdentifier": "5511999999999@s.whatsapp.net",
            "message": "Failed to get status from plugin"
        }"#;
        let status: InstanceStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.instance_id.as_deref(), Some("i1"));
        assert_eq!(status.connected_at, None);
        assert_eq!(status.profile_name, None);
        assert_eq!(status.message.as_deref(), Some("Failed to get status from plugin"));
    }

    #[test]
    fn test_pair_request_serialization() {
        let request = PairRequest {
            phone_number: "+5511999999999",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"phoneNumber": "+5511999999999"})
        );
    }
}
