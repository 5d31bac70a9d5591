//! Mock persona responder for testing and keyless deployments.
//!
//! Serves scripted replies in order, then falls back to a canned line.
//! Supports error injection and call tracking so orchestrator tests can
//! verify the fallback path and the exact windows handed to the
//! responder.
//!
//! # Example
//!
//! ```ignore
//! let responder = MockPersonaResponder::new()
//!     .with_reply("Hello beta, who is calling?")
//!     .with_delay(Duration::from_millis(50));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::{Intelligence, Message};
use crate::ports::{PersonaResponder, ResponderError};

/// Reply served when the script runs out.
const DEFAULT_REPLY: &str = "I am confused, please explain clearly.";

/// A scripted turn: either a reply or an injected failure.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this reply.
    Reply(String),
    /// Fail with this error.
    Error(ResponderError),
}

/// Mock persona responder.
///
/// Clones share the same script and call history.
#[derive(Debug, Clone, Default)]
pub struct MockPersonaResponder {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    delay: Duration,
    /// Window sizes seen per call, for verification.
    calls: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockPersonaResponder {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a scripted reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Reply(reply.into()));
        self
    }

    /// Queues an injected failure.
    pub fn with_error(self, error: ResponderError) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Error(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The conversation windows handed to each call, in order.
    pub fn recorded_windows(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    fn next_scripted(&self) -> ScriptedReply {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ScriptedReply::Reply(DEFAULT_REPLY.to_string()))
    }
}

#[async_trait]
impl PersonaResponder for MockPersonaResponder {
    async fn respond(
        &self,
        window: &[Message],
        _intelligence: &Intelligence,
    ) -> Result<String, ResponderError> {
        self.calls.lock().unwrap().push(window.to_vec());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_scripted() {
            ScriptedReply::Reply(reply) => Ok(reply),
            ScriptedReply::Error(err) => Err(err),
        }
    }
}
