//! Report delivery adapters.

mod http_reporter;

pub use http_reporter::HttpIntelReporter;
