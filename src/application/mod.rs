//! Application layer - orchestration of one engagement turn.
//!
//! Coordinates the domain (extraction, classification, session state)
//! with the ports (persona responder, intel reporter) and the session
//! store. Holds no conversation state of its own.

mod orchestrator;

pub use orchestrator::{EngagementOutcome, OrchestratorConfig, SessionOrchestrator, FALLBACK_REPLY};
