//! Intel Reporter Port - one-shot final-result callback.
//!
//! Once a session is confirmed as a scam and enough messages have been
//! exchanged, the orchestrator hands a summary of the engagement to this
//! port exactly once. Delivery runs in the background; failures are
//! logged and never affect the request path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::Intelligence;

/// Summary of one engagement, delivered to the collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementReport {
    /// The session this report describes.
    pub session_id: SessionId,
    /// Whether the session classified as a scam (always true when a
    /// report fires, kept explicit for the wire contract).
    pub scam_detected: bool,
    /// Total messages exchanged in both directions.
    pub total_messages_exchanged: usize,
    /// Everything collected over the engagement.
    pub extracted_intelligence: Intelligence,
    /// Free-text notes about how the engagement went.
    pub agent_notes: String,
}

impl EngagementReport {
    /// Builds a report from a session snapshot.
    pub fn new(
        session_id: SessionId,
        total_messages_exchanged: usize,
        extracted_intelligence: Intelligence,
    ) -> Self {
        Self {
            session_id,
            scam_detected: true,
            total_messages_exchanged,
            extracted_intelligence,
            agent_notes: "Scam confirmed. Agent kept the counterpart engaged while collecting \
                          payment identifiers and links."
                .to_string(),
        }
    }
}

/// Port for delivering engagement reports.
#[async_trait]
pub trait IntelReporter: Send + Sync {
    /// Delivers one report. Implementations decide transport and retry.
    async fn report(&self, report: EngagementReport) -> Result<(), ReportError>;
}

/// Report delivery errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The collection endpoint rejected the report.
    #[error("report rejected with status {status}")]
    Rejected {
        /// HTTP status returned by the endpoint.
        status: u16,
    },

    /// Network failure while delivering.
    #[error("network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = EngagementReport::new(SessionId::new("s-9"), 12, Intelligence::new());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["sessionId"], "s-9");
        assert_eq!(json["scamDetected"], true);
        assert_eq!(json["totalMessagesExchanged"], 12);
        assert!(json["extractedIntelligence"].is_object());
        assert!(json["agentNotes"].is_string());
    }
}
