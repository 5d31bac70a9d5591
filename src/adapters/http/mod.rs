//! HTTP adapter - the service boundary.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use routes::honeypot_router;
