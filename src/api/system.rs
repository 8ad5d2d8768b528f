//! System API

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// Server health report
///
/// A degraded server answers with HTTP 503, which surfaces as
/// [`OmniError::Api`] rather than a `HealthStatus`.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// "healthy", "degraded" or "unhealthy"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Per-dependency checks keyed by name (e.g., "database", "nats")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<HashMap<String, HealthCheck>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<InstanceCounts>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// One dependency check
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthCheck {
    /// "ok" or "error"
    pub status: String,
    /// Milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCounts {
    pub total: u64,
    pub connected: u64,
    #[serde(default)]
    pub by_channel: HashMap<String, u64>,
}

/// Server build and usage summary
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub version: String,
    /// Server runtime environment (e.g., "production")
    pub environment: String,
    /// Seconds
    pub uptime: u64,
    pub instances: InstanceCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<EventCounts>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventCounts {
    pub today: u64,
    pub total: u64,
}

/// System API
pub struct SystemApi {
    context: Arc<OmniContext>,
}

impl SystemApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthStatus, OmniError> {
        let body = self.context.client.get("/health", &[]).await?;
        self.decode(&body)
    }

    /// GET /info
    pub async fn info(&self) -> Result<SystemInfo, OmniError> {
        let body = self.context.client.get("/info", &[]).await?;
        self.decode(&body)
    }
}

impl OmniApi for SystemApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "system"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_parse_minimal() {
        let health: HealthStatus = serde_json::from_str(r#"{"status": "healthy"}"#).unwrap();
        assert!(health.is_healthy());
        assert!(health.checks.is_none());
        assert!(health.instances.is_none());
    }

    #[test]
    fn test_health_parse_full() {
        let json = r#"{
            "status": "healthy",
            "version": "2.0.0",
            "uptime": 3600,
            "timestamp": "2025-01-01T00:00:00Z",
            "checks": {
                "database": {"status": "ok", "latency": 1.5},
                "nats": {"status": "ok", "latency": 0.4, "details": {"jetstream": true}}
            },
            "instances": {"total": 3, "connected": 2, "byChannel": {"discord": 1, "whatsapp-baileys": 2}}
        }"#;
        let health: HealthStatus = serde_json::from_str(json).unwrap();

        assert_eq!(health.version.as_deref(), Some("2.0.0"));
        assert_eq!(health.uptime, Some(3600));
        let checks = health.checks.unwrap();
        assert_eq!(checks["database"].status, "ok");
        assert_eq!(checks["nats"].details.as_ref().unwrap()["jetstream"], true);
        let instances = health.instances.unwrap();
        assert_eq!(instances.connected, 2);
        assert_eq!(instances.by_channel["whatsapp-baileys"], 2);
    }

    #[test]
    fn test_info_parse() {
        let json = r#"{
            "version": "2.0.0",
            "environment": "production",
            "uptime": 120,
            "instances": {"total": 4, "connected": 1},
            "events": {"today": 0, "total": 0}
        }"#;
        let info: SystemInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.environment, "production");
        assert_eq!(info.instances.total, 4);
        assert!(info.instances.by_channel.is_empty());
        assert_eq!(info.events.unwrap().today, 0);
    }

    #[test]
    fn test_degraded_is_not_healthy() {
        let health: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!health.is_healthy());
    }
}
