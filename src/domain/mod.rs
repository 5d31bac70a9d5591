//! Domain layer - the deterministic core of the honeypot.
//!
//! Everything in this module is pure and synchronous: messages,
//! per-session intelligence, the pattern extractor, and the scam
//! classifier. Session storage and the persona responder live behind
//! adapters and ports.

pub mod classification;
pub mod extraction;
pub mod foundation;
pub mod intelligence;
pub mod message;
pub mod session;

pub use classification::{Classifier, DISTINCT_KEYWORD_THRESHOLD};
pub use extraction::Extractor;
pub use intelligence::{Finding, FindingKind, Intelligence};
pub use message::{Message, Sender};
pub use session::Session;
