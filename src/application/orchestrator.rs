//! Session orchestrator: the single write path for conversation state.
//!
//! One engagement turn is two short critical sections around one slow
//! external call:
//!
//! 1. Under the session lock: append the counterpart message, merge
//!    findings, classify, snapshot what the responder needs.
//! 2. Outside any lock: ask the persona responder for a reply (fallback
//!    on failure).
//! 3. Under the session lock again: append the agent reply and decide
//!    whether the one-shot report fires.
//!
//! The session lock is never held across the responder call.

use std::sync::Arc;

use crate::adapters::{InMemorySessionStore, StoreError};
use crate::domain::foundation::{CoreError, SessionId, Timestamp};
use crate::domain::{Classifier, Extractor, Intelligence, Message};
use crate::ports::{EngagementReport, IntelReporter, PersonaResponder};

/// Reply substituted whenever the responder fails or returns nothing.
///
/// Stays in character so a failed upstream call never breaks the
/// engagement.
pub const FALLBACK_REPLY: &str = "Beta, I cannot hear you properly. Please type again?";

/// Tuning for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Messages handed to the responder per turn, newest last.
    pub window_messages: usize,
    /// Total message count at which a confirmed scam triggers the
    /// one-shot report.
    pub report_threshold: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            window_messages: 12,
            report_threshold: 10,
        }
    }
}

/// What one engagement turn produces.
#[derive(Debug, Clone)]
pub struct EngagementOutcome {
    /// The persona's reply to relay to the counterpart.
    pub reply: String,
    /// Scam verdict after this turn.
    pub scam_detected: bool,
    /// Intelligence accumulated so far, including this turn's findings.
    pub intelligence: Intelligence,
}

/// Snapshot taken under the session lock for the responder call.
struct TurnSnapshot {
    window: Vec<Message>,
    intelligence: Intelligence,
}

/// What the post-reply critical section decides.
struct TurnClose {
    scam_detected: bool,
    intelligence: Intelligence,
    total_messages: usize,
    dispatch_report: bool,
}

/// Drives one conversation turn end to end.
pub struct SessionOrchestrator {
    store: Arc<InMemorySessionStore>,
    responder: Arc<dyn PersonaResponder>,
    reporter: Option<Arc<dyn IntelReporter>>,
    extractor: Extractor,
    classifier: Classifier,
    config: OrchestratorConfig,
}

impl SessionOrchestrator {
    /// Creates an orchestrator with default extraction patterns.
    pub fn new(
        store: Arc<InMemorySessionStore>,
        responder: Arc<dyn PersonaResponder>,
        reporter: Option<Arc<dyn IntelReporter>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            responder,
            reporter,
            extractor: Extractor::new(),
            classifier: Classifier::new(),
            config,
        }
    }

    /// Replaces the default extractor, for custom pattern sets.
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Handles one inbound counterpart message.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the text is empty; no session is created or
    ///   touched in that case
    /// - `StoreContention` if the session lock stayed busy through the
    ///   bounded retry budget
    pub async fn handle(
        &self,
        session_id: SessionId,
        text: &str,
        timestamp: Timestamp,
    ) -> Result<EngagementOutcome, CoreError> {
        // Validate before any session state exists.
        let inbound = Message::counterpart(text, timestamp)?;

        self.store.get_or_create(&session_id).await;

        // Extraction is pure and can run outside the lock.
        let findings = self.extractor.extract(text);
        let window_messages = self.config.window_messages;
        let classifier = self.classifier;

        // A reset or eviction can land between get_or_create and this
        // update; recreate and retry once so the turn never fails with a
        // vanished session.
        let mut snapshot = None;
        for attempt in 0..2 {
            let inbound = inbound.clone();
            let findings = findings.clone();
            let result = self
                .store
                .apply_update(&session_id, move |session| {
                    session.record_message(inbound);
                    session.absorb_findings(&findings);
                    session.apply_verdict(classifier.classify(session.intelligence()));
                    TurnSnapshot {
                        window: session.recent_window(window_messages).to_vec(),
                        intelligence: session.intelligence().clone(),
                    }
                })
                .await;

            match result {
                Ok(taken) => {
                    snapshot = Some(taken);
                    break;
                }
                Err(StoreError::SessionNotFound(_)) if attempt == 0 => {
                    tracing::warn!(session_id = %session_id, "session vanished before update, recreating");
                    self.store.get_or_create(&session_id).await;
                }
                Err(err) => return Err(map_store_error(err)),
            }
        }
        let snapshot = snapshot.ok_or_else(|| CoreError::session_not_found(session_id.clone()))?;

        // Slow external call, no locks held.
        let reply = match self
            .responder
            .respond(&snapshot.window, &snapshot.intelligence)
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                tracing::warn!(session_id = %session_id, "responder returned empty reply");
                FALLBACK_REPLY.to_string()
            }
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "responder failed, using fallback");
                FALLBACK_REPLY.to_string()
            }
        };

        let close = self.close_turn(&session_id, &reply).await?;

        if close.dispatch_report {
            self.dispatch_report(&session_id, &close);
        }

        tracing::debug!(
            session_id = %session_id,
            scam_detected = close.scam_detected,
            total_messages = close.total_messages,
            intel_entries = close.intelligence.total_entries(),
            "engagement turn complete"
        );

        Ok(EngagementOutcome {
            reply,
            scam_detected: close.scam_detected,
            intelligence: close.intelligence,
        })
    }

    /// Discards a session entirely.
    ///
    /// Returns true if a session existed.
    pub async fn reset(&self, session_id: &SessionId) -> Result<bool, CoreError> {
        self.store.reset(session_id).await.map_err(map_store_error)
    }

    /// Appends the agent reply and latches the report flag if this turn
    /// crossed the threshold. Retries once through re-creation if the
    /// session vanished while the responder ran.
    async fn close_turn(&self, session_id: &SessionId, reply: &str) -> Result<TurnClose, CoreError> {
        let report_threshold = self.config.report_threshold;
        let reporting_enabled = self.reporter.is_some();

        for attempt in 0..2 {
            let agent_message = Message::agent(reply)?;
            let result = self
                .store
                .apply_update(session_id, move |session| {
                    session.record_message(agent_message);
                    let total_messages = session.messages().len();
                    let dispatch_report = reporting_enabled
                        && session.scam_detected()
                        && total_messages >= report_threshold
                        && !session.report_sent();
                    if dispatch_report {
                        session.mark_report_sent();
                    }
                    TurnClose {
                        scam_detected: session.scam_detected(),
                        intelligence: session.intelligence().clone(),
                        total_messages,
                        dispatch_report,
                    }
                })
                .await;

            match result {
                Ok(close) => return Ok(close),
                // Reset or evicted mid-turn: the reply still goes out, on
                // a fresh session.
                Err(StoreError::SessionNotFound(_)) if attempt == 0 => {
                    tracing::warn!(session_id = %session_id, "session vanished mid-turn, recreating");
                    self.store.get_or_create(session_id).await;
                }
                Err(err) => return Err(map_store_error(err)),
            }
        }

        Err(CoreError::session_not_found(session_id.clone()))
    }

    /// Fires the one-shot report in the background. Failures are logged;
    /// the request path never waits on delivery.
    fn dispatch_report(&self, session_id: &SessionId, close: &TurnClose) {
        let Some(reporter) = self.reporter.clone() else {
            return;
        };
        let report = EngagementReport::new(
            session_id.clone(),
            close.total_messages,
            close.intelligence.clone(),
        );
        let session_id = session_id.clone();
        tokio::spawn(async move {
            tracing::info!(session_id = %session_id, "dispatching engagement report");
            if let Err(err) = reporter.report(report).await {
                tracing::error!(session_id = %session_id, error = %err, "engagement report failed");
            }
        });
    }
}

fn map_store_error(err: StoreError) -> CoreError {
    match err {
        StoreError::SessionNotFound(id) => CoreError::session_not_found(id),
        StoreError::Contended(id) => CoreError::store_contention(id),
    }
}
