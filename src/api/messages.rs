//! Message Sending API
//!
//! Four send shapes, each with its own endpoint:
//!
//! - text: POST /messages
//! - media: POST /messages/media
//! - reaction: POST /messages/reaction (no payload returned)
//! - location: POST /messages/location

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use super::common::DataEnvelope;
use super::{OmniApi, OmniContext};
use crate::error::OmniError;

/// Text message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    pub instance_id: String,
    /// Chat or user identifier on the channel
    pub to: String,
    pub text: String,
    /// ID of the message being replied to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl SendMessageParams {
    pub fn new(
        instance_id: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            to: to.into(),
            text: text.into(),
            reply_to: None,
        }
    }

    pub fn reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }
}

/// Media kinds accepted by the media endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media message. Supply either `url` or `base64`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMediaParams {
    pub instance_id: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Send audio as a voice note (push-to-talk)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_note: Option<bool>,
}

impl SendMediaParams {
    pub fn new(instance_id: impl Into<String>, to: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            instance_id: instance_id.into(),
            to: to.into(),
            kind,
            url: None,
            base64: None,
            filename: None,
            caption: None,
            voice_note: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn base64(mut self, data: impl Into<String>) -> Self {
        self.base64 = Some(data.into());
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn voice_note(mut self, voice_note: bool) -> Self {
        self.voice_note = Some(voice_note);
        self
    }
}

/// Emoji reaction to an existing message
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReactionParams {
    pub instance_id: String,
    pub to: String,
    pub message_id: String,
    pub emoji: String,
}

impl SendReactionParams {
    pub fn new(
        instance_id: impl Into<String>,
        to: impl Into<String>,
        message_id: impl Into<String>,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            to: to.into(),
            message_id: message_id.into(),
            emoji: emoji.into(),
        }
    }
}

/// Location pin
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLocationParams {
    pub instance_id: String,
    pub to: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SendLocationParams {
    pub fn new(
        instance_id: impl Into<String>,
        to: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            to: to.into(),
            latitude,
            longitude,
            name: None,
            address: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Result of a send operation
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub message_id: String,
    /// Delivery status reported by the server (e.g., "queued", "sent")
    pub status: String,
}

/// Message API
pub struct MessagesApi {
    context: Arc<OmniContext>,
}

impl MessagesApi {
    pub fn new(context: Arc<OmniContext>) -> Self {
        Self { context }
    }

    /// Send a text message
    pub async fn send(&self, params: &SendMessageParams) -> Result<SendResult, OmniError> {
        self.send_to("/messages", params).await
    }

    /// Send an image, audio, video or document
    pub async fn send_media(&self, params: &SendMediaParams) -> Result<SendResult, OmniError> {
        debug!("[Omni] sending {} to {}", params.kind, params.to);
        self.send_to("/messages/media", params).await
    }

    /// React to a message. The server returns no payload of interest.
    pub async fn send_reaction(&self, params: &SendReactionParams) -> Result<(), OmniError> {
        self.context
            .client
            .post("/messages/reaction", params)
            .await?;
        Ok(())
    }

    /// Send a location pin
    pub async fn send_location(
        &self,
        params: &SendLocationParams,
    ) -> Result<SendResult, OmniError> {
        self.send_to("/messages/location", params).await
    }

    async fn send_to<B: Serialize>(&self, path: &str, params: &B) -> Result<SendResult, OmniError> {
        let body = self.context.client.post(path, params).await?;
        let envelope: DataEnvelope<SendResult> = self.decode(&body)?;
        Ok(envelope.data)
    }
}

impl OmniApi for MessagesApi {
    fn context(&self) -> &OmniContext {
        &self.context
    }

    fn api_name(&self) -> &'static str {
        "messages"
    }
}
