//! Message entity for honeypot conversations.
//!
//! Messages are immutable records of counterpart/agent exchanges within a
//! session. Each message has a sender, non-empty text, and a timestamp.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CoreError, Timestamp};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The suspected fraud actor on the other end of the conversation.
    Counterpart,
    /// The honeypot persona.
    Agent,
}

/// An immutable message within a session.
///
/// # Invariants
///
/// - `text` is non-empty (validated at construction)
/// - fields never change after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
    timestamp: Timestamp,
}

impl Message {
    /// Creates a new message with the given sender and text.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if text is empty or whitespace-only
    pub fn new(
        sender: Sender,
        text: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<Self, CoreError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CoreError::invalid_input("message text is empty"));
        }

        Ok(Self {
            sender,
            text,
            timestamp,
        })
    }

    /// Creates a counterpart message with a client-supplied timestamp.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if text is empty or whitespace-only
    pub fn counterpart(text: impl Into<String>, timestamp: Timestamp) -> Result<Self, CoreError> {
        Self::new(Sender::Counterpart, text, timestamp)
    }

    /// Creates an agent message timestamped now.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if text is empty or whitespace-only
    pub fn agent(text: impl Into<String>) -> Result<Self, CoreError> {
        Self::new(Sender::Agent, text, Timestamp::now())
    }

    /// Returns the sender.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns when the message was sent.
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// True if this message came from the counterpart.
    pub fn is_counterpart(&self) -> bool {
        self.sender == Sender::Counterpart
    }

    /// True if this message came from the agent.
    pub fn is_agent(&self) -> bool {
        self.sender == Sender::Agent
    }
}
