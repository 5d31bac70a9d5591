//! Route assembly for the honeypot service.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{engage_message, health, reset_session, AppState};
use super::middleware::{api_key_middleware, ApiKeyAuth};

/// Builds the full router.
///
/// The honeypot endpoints sit behind the API key layer; the health probe
/// does not.
pub fn honeypot_router(state: AppState, auth: Arc<ApiKeyAuth>) -> Router {
    let protected = Router::new()
        .route("/honeypot/message", post(engage_message))
        .route("/honeypot/sessions/:id/reset", post(reset_session))
        .route_layer(middleware::from_fn_with_state(auth, api_key_middleware))
        .with_state(state);

    Router::new().route("/health", get(health)).merge(protected)
}
