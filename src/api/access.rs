//! Access Control API
//!
//! Manage allow/deny rules and ask the server for an access decision.
//!
//! Rule matching (priority order, phone wildcards) happens server-side only;
//! [`AccessApi::check`] shapes the request and decodes the verdict.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::common::{segment, DataEnvelope, ItemsEnvelope, QueryBuilder};
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// Rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Allow,
    Deny,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Allow => "allow",
            RuleType::Deny => "deny",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens to a matching sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Block,
    Allow,
    /// Drop without notifying the sender
    SilentBlock,
}

/// An access rule
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    pub id: String,
    /// "allow" or "deny"
    pub rule_type: String,
    /// Absent for global rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    pub priority: i32,
    /// "block", "allow" or "silent_block"
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_message: Option<String>,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub created_at: String,
}

/// Filters for listing rules
#[derive(Debug, Clone, Default)]
pub struct ListAccessRulesParams {
    pub instance_id: Option<String>,
    pub rule_type: Option<RuleType>,
}

impl ListAccessRulesParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        QueryBuilder::new()
            .opt("instanceId", self.instance_id.as_ref())
            .opt("type", self.rule_type)
            .build()
    }
}

/// Body for creating a rule
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessRuleParams {
    pub rule_type: RuleType,
    /// Leave unset for a global rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    /// Phone pattern; `*` wildcards allowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    /// Higher is checked first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// ISO 8601 expiry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_message: Option<String>,
}

impl CreateAccessRuleParams {
    pub fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            instance_id: None,
            phone_pattern: None,
            platform_user_id: None,
            person_id: None,
            priority: None,
            enabled: None,
            reason: None,
            expires_at: None,
            action: None,
            block_message: None,
        }
    }
}

/// Partial rule update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccessRuleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckAccessRequest<'a> {
    instance_id: &'a str,
    platform_user_id: &'a str,
    channel: &'a str,
}

/// Access decision for one platform user
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckAccessResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The rule that decided the outcome, if any matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<AccessRule>,
}

/// Access control API
pub struct AccessApi {
    context: Arc<OmniContext>,
}

impl AccessApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// GET /access/rules
    pub async fn list_rules(
        &self,
        params: Option<&ListAccessRulesParams>,
    ) -> Result<Vec<AccessRule>, OmniError> {
        let query = params
            .map(ListAccessRulesParams::to_query)
            .unwrap_or_default();
        let body = self.context.client.get("/access/rules", &query).await?;
        let envelope: ItemsEnvelope<AccessRule> = self.decode(&body)?;
        Ok(envelope.items)
    }

    /// GET /access/rules/:id
    pub async fn get_rule(&self, id: &str) -> Result<AccessRule, OmniError> {
        let path = format!("/access/rules/{}", segment(id));
        let body = self.context.client.get(&path, &[]).await?;
        let envelope: DataEnvelope<AccessRule> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// POST /access/rules
    pub async fn create_rule(
        &self,
        params: &CreateAccessRuleParams,
    ) -> Result<AccessRule, OmniError> {
        let body = self.context.client.post("/access/rules", params).await?;
        let envelope: DataEnvelope<AccessRule> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// PATCH /access/rules/:id
    pub async fn update_rule(
        &self,
        id: &str,
        params: &UpdateAccessRuleParams,
    ) -> Result<AccessRule, OmniError> {
        let path = format!("/access/rules/{}", segment(id));
        let body = self.context.client.patch(&path, params).await?;
        let envelope: DataEnvelope<AccessRule> = self.decode(&body)?;
        Ok(envelope.data)
    }

    /// DELETE /access/rules/:id
    pub async fn delete_rule(&self, id: &str) -> Result<(), OmniError> {
        let path = format!("/access/rules/{}", segment(id));
        self.context.client.delete(&path).await
    }

    /// Ask the server whether `platform_user_id` may talk to `instance_id`
    ///
    /// POST /access/check
    pub async fn check(
        &self,
        instance_id: &str,
        platform_user_id: &str,
        channel: &str,
    ) -> Result<CheckAccessResult, OmniError> {
        let request = CheckAccessRequest {
            instance_id,
            platform_user_id,
            channel,
        };
        let body = self.context.client.post("/access/check", &request).await?;
        let envelope: DataEnvelope<CheckAccessResult> = self.decode(&body)?;
        Ok(envelope.data)
    }
}

impl OmniApi for AccessApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "access"
    }
}
