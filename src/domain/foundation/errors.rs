//! Error taxonomy for the honeypot core.

use thiserror::Error;

use super::SessionId;

/// Errors surfaced by the session orchestrator and store.
///
/// Only `InvalidInput` is a caller mistake; the others describe internal
/// conditions that the orchestrator either recovers from
/// (`SessionNotFound`, via re-creation) or retries before surfacing
/// (`StoreContention`). Responder failures never reach this taxonomy;
/// the orchestrator substitutes the fallback reply.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Empty or malformed message, rejected before touching session state.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Update requested on an unknown or evicted session.
    #[error("session not found: {session_id}")]
    SessionNotFound {
        /// The missing session.
        session_id: SessionId,
    },

    /// Per-session lock could not be acquired within the bounded retry
    /// budget.
    #[error("session store contended for {session_id}")]
    StoreContention {
        /// The contended session.
        session_id: SessionId,
    },
}

impl CoreError {
    /// Creates an invalid input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a session not found error.
    pub fn session_not_found(session_id: SessionId) -> Self {
        Self::SessionNotFound { session_id }
    }

    /// Creates a store contention error.
    pub fn store_contention(session_id: SessionId) -> Self {
        Self::StoreContention { session_id }
    }

    /// True if the condition is transient and worth retrying internally.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::StoreContention { .. })
    }
}
