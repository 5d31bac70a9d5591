//! Persona Responder Port - interface to the external text generator.
//!
//! The responder is the only non-deterministic collaborator in the
//! system. It receives a bounded conversation window plus the
//! intelligence collected so far and returns the persona's next reply.
//! The orchestrator treats every failure the same way: substitute the
//! fixed fallback reply and keep the session update intact.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Intelligence, Message};

/// Port for persona reply generation.
///
/// Implementations call an external text-generation service (or a mock in
/// tests) and translate provider-specific failures into
/// [`ResponderError`].
#[async_trait]
pub trait PersonaResponder: Send + Sync {
    /// Generates the persona's reply to the conversation so far.
    ///
    /// `window` is the bounded recent conversation, oldest first, ending
    /// with the counterpart message being answered. `intelligence` is a
    /// snapshot of what the session has collected; implementations may
    /// use it to steer the persona but must not mutate session state.
    async fn respond(
        &self,
        window: &[Message],
        intelligence: &Intelligence,
    ) -> Result<String, ResponderError>;
}

/// Persona responder errors.
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Rate limited by the upstream service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Upstream service is unavailable.
    #[error("responder unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the upstream response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ResponderError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True if another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResponderError::Timeout { .. }
                | ResponderError::RateLimited { .. }
                | ResponderError::Unavailable { .. }
                | ResponderError::Network(_)
        )
    }
}
