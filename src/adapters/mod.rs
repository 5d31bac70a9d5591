//! Adapters - concrete implementations at the system's edges.

pub mod ai;
pub mod http;
pub mod report;
pub mod store;

pub use ai::{MockPersonaResponder, OpenAiResponder, ResponderConfig};
pub use report::HttpIntelReporter;
pub use store::{InMemorySessionStore, SessionStoreConfig, StoreError};
