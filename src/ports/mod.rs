//! Ports - interfaces to external collaborators.
//!
//! The deterministic core (extraction, classification, session
//! bookkeeping) never talks to the network directly; it goes through
//! these narrow traits so it stays testable without external services.

mod intel_reporter;
mod persona_responder;

pub use intel_reporter::{EngagementReport, IntelReporter, ReportError};
pub use persona_responder::{PersonaResponder, ResponderError};
