use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Transport-level failure, tagged with the phase of the round trip that failed.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("failed to marshal request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to create request: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Send(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),
}

impl HttpError {
    /// Returns `true` when the configured timeout elapsed before the call completed.
    pub fn is_timeout(&self) -> bool {
        match self {
            HttpError::Send(e) | HttpError::Read(e) => e.is_timeout(),
            HttpError::Encode(_) | HttpError::Build(_) => false,
        }
    }
}

/// Error returned by the Omni API for any response with status >= 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Human-readable message, or the raw body when it was not a JSON error object
    pub message: String,
    /// Machine-readable error code, when the server supplied one
    pub code: Option<String>,
    /// HTTP status code of the response
    pub status: u16,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            message: message.into(),
            code,
            status,
        }
    }

    /// Classify an error response body.
    ///
    /// Bodies shaped like `{"error": "...", "code": "..."}` are decoded;
    /// anything else becomes the message verbatim with no code.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) => Self::new(status, parsed.error, parsed.code),
            Err(_) => Self::new(status, String::from_utf8_lossy(body), None),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(
                f,
                "{} (code: {}) [HTTP {}]",
                self.message, code, self.status
            ),
            None => write!(f, "{} [HTTP {}]", self.message, self.status),
        }
    }
}

impl std::error::Error for ApiError {}

/// Omni SDK error types
#[derive(Debug, Error)]
pub enum OmniError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Omni API error: {0}")]
    Api(#[from] ApiError),

    #[error("failed to parse response: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OmniError {
    /// HTTP status code for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            OmniError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    /// Machine-readable code for API errors that carry one
    pub fn api_code(&self) -> Option<&str> {
        match self {
            OmniError::Api(e) => e.code.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, OmniError::Http(e) if e.is_timeout())
    }
}
