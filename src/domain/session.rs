//! Session aggregate: one tracked conversation with a counterpart.

use serde::{Deserialize, Serialize};

use super::foundation::{SessionId, Timestamp};
use super::intelligence::{Finding, Intelligence};
use super::message::Message;

/// The unit of conversation state.
///
/// # Invariants
///
/// - `messages` is append-only; insertion order is conversation order
/// - `scam_detected` is monotonic: once true it never reverts within the
///   session's lifetime
/// - `last_activity` moves forward on every accepted message
///
/// A session is owned by the session store and mutated only through the
/// orchestrator's update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    messages: Vec<Message>,
    intelligence: Intelligence,
    scam_detected: bool,
    last_activity: Timestamp,
    created_at: Timestamp,
    report_sent: bool,
}

impl Session {
    /// Creates a fresh session.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            messages: Vec::new(),
            intelligence: Intelligence::new(),
            scam_detected: false,
            last_activity: now,
            created_at: now,
            report_sent: false,
        }
    }

    /// Returns the session identifier.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the full conversation in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the accumulated intelligence.
    pub fn intelligence(&self) -> &Intelligence {
        &self.intelligence
    }

    /// True once the conversation has classified as a scam.
    pub fn scam_detected(&self) -> bool {
        self.scam_detected
    }

    /// When the session last accepted a message.
    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    /// When the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// True once the final-result callback has been dispatched.
    pub fn report_sent(&self) -> bool {
        self.report_sent
    }

    /// Appends a message and refreshes the activity clock.
    pub fn record_message(&mut self, message: Message) {
        self.messages.push(message);
        self.last_activity = Timestamp::now();
    }

    /// Merges extracted findings into the session intelligence.
    ///
    /// Returns the number of newly added entries.
    pub fn absorb_findings(&mut self, findings: &[Finding]) -> usize {
        self.intelligence.merge(findings)
    }

    /// Applies a classifier verdict; `scam_detected` only ever ORs upward.
    pub fn apply_verdict(&mut self, verdict: bool) {
        self.scam_detected = self.scam_detected || verdict;
    }

    /// Latches the one-shot report flag.
    pub fn mark_report_sent(&mut self) {
        self.report_sent = true;
    }

    /// True if the session has been idle past the window.
    pub fn is_idle(&self, now: &Timestamp, window_secs: u64) -> bool {
        self.last_activity.is_idle_at(now, window_secs)
    }

    /// The last `n` messages, oldest first. The persisted history is
    /// never truncated; this only bounds what a caller sees.
    pub fn recent_window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}
