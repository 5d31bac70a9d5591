//! HTTP handlers for the honeypot endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::SessionOrchestrator;
use crate::domain::foundation::{CoreError, SessionId};

use super::dto::{EngageRequest, EngageResponse, ErrorResponse, HealthResponse, ResetResponse};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The single write path for all sessions.
    pub orchestrator: Arc<SessionOrchestrator>,
}

impl AppState {
    /// Creates the handler state.
    pub fn new(orchestrator: Arc<SessionOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// POST /honeypot/message - run one engagement turn.
pub async fn engage_message(
    State(state): State<AppState>,
    Json(req): Json<EngageRequest>,
) -> Response {
    let session_id = SessionId::new(req.session_id);
    let timestamp = req.message.resolved_timestamp();

    match state
        .orchestrator
        .handle(session_id, &req.message.text, timestamp)
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(EngageResponse::success(
                outcome.reply,
                outcome.scam_detected,
                outcome.intelligence,
            )),
        )
            .into_response(),
        Err(e) => handle_core_error(e),
    }
}

/// POST /honeypot/sessions/:id/reset - discard a session.
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = SessionId::new(session_id);

    match state.orchestrator.reset(&session_id).await {
        Ok(existed) => (
            StatusCode::OK,
            Json(ResetResponse {
                status: "success".to_string(),
                existed,
            }),
        )
            .into_response(),
        Err(e) => handle_core_error(e),
    }
}

/// GET /health - liveness probe, unauthenticated.
pub async fn health() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "running".to_string(),
            msg: "honeypot agent is active".to_string(),
        }),
    )
        .into_response()
}

/// Maps domain errors onto HTTP status codes.
fn handle_core_error(error: CoreError) -> Response {
    let (status, message) = match &error {
        CoreError::InvalidInput { reason } => (StatusCode::BAD_REQUEST, reason.clone()),
        CoreError::SessionNotFound { session_id } => (
            StatusCode::NOT_FOUND,
            format!("session not found: {session_id}"),
        ),
        CoreError::StoreContention { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            "session is busy, retry shortly".to_string(),
        ),
    };

    tracing::debug!(status = %status, error = %error, "request failed");
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let response = handle_core_error(CoreError::invalid_input("message text is empty"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn contention_maps_to_service_unavailable() {
        let response = handle_core_error(CoreError::store_contention(SessionId::new("s-1")));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
