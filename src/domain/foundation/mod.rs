//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::CoreError;
pub use ids::SessionId;
pub use timestamp::Timestamp;
