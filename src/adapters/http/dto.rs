//! HTTP DTOs for the honeypot endpoints.
//!
//! These types pin the wire contract independently of the domain types.
//! Inbound keys are camelCase (`sessionId`); the engage response mixes
//! snake_case (`scam_detected`) with a camelCase intelligence object,
//! matching what the evaluation harness expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::Intelligence;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One inbound counterpart message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    /// Declared sender; informational only, inbound traffic is always
    /// treated as the counterpart.
    #[serde(default)]
    pub sender: Option<String>,
    /// Message text.
    pub text: String,
    /// Client-supplied timestamp, RFC 3339. Falls back to receipt time
    /// when absent or unparsable.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl MessageDto {
    /// Resolves the client timestamp, tolerating junk.
    pub fn resolved_timestamp(&self) -> Timestamp {
        self.timestamp
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
            .unwrap_or_else(Timestamp::now)
    }
}

/// Request body for `POST /honeypot/message`.
///
/// Unknown fields (client-echoed history, metadata) are accepted and
/// ignored; the session store is the source of truth for history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageRequest {
    /// Conversation identifier chosen by the caller.
    pub session_id: String,
    /// The message to respond to.
    pub message: MessageDto,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response body for `POST /honeypot/message`.
#[derive(Debug, Clone, Serialize)]
pub struct EngageResponse {
    /// Always `"success"` on the happy path.
    pub status: String,
    /// The persona's reply.
    pub reply: String,
    /// Scam verdict after this turn.
    pub scam_detected: bool,
    /// Intelligence accumulated so far (camelCase keys).
    pub intelligence: Intelligence,
}

impl EngageResponse {
    /// Builds the success response.
    pub fn success(reply: String, scam_detected: bool, intelligence: Intelligence) -> Self {
        Self {
            status: "success".to_string(),
            reply,
            scam_detected,
            intelligence,
        }
    }
}

/// Response body for `POST /honeypot/sessions/{id}/reset`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    /// Always `"success"`.
    pub status: String,
    /// True if a session existed and was discarded.
    pub existed: bool,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"running"`.
    pub status: String,
    /// Human-readable liveness note.
    pub msg: String,
}

/// Error envelope for all non-2xx responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// What went wrong.
    pub message: String,
}

impl ErrorResponse {
    /// Creates an error envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
