//! Shared-secret authentication middleware.
//!
//! Every honeypot endpoint requires the static API key in the
//! `x-api-key` header. The comparison is constant time so the key cannot
//! be probed byte by byte. The health probe is mounted outside this
//! layer.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use super::super::dto::ErrorResponse;

/// Holds the expected API key.
#[derive(Clone)]
pub struct ApiKeyAuth {
    key: Secret<String>,
}

impl ApiKeyAuth {
    /// Creates the auth state from the configured key.
    pub fn new(key: Secret<String>) -> Arc<Self> {
        Arc::new(Self { key })
    }

    /// Constant-time check of a presented key.
    fn verify(&self, presented: &str) -> bool {
        presented
            .as_bytes()
            .ct_eq(self.key.expose_secret().as_bytes())
            .into()
    }
}

/// Rejects any request without a matching `x-api-key` header.
///
/// Runs before any session logic: an unauthenticated request never
/// creates or touches a session.
pub async fn api_key_middleware(
    State(auth): State<Arc<ApiKeyAuth>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|h| h.to_str().ok());

    match presented {
        Some(key) if auth.verify(key) => next.run(request).await,
        _ => {
            tracing::warn!("request rejected: invalid or missing API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid or Missing API Key")),
            )
                .into_response()
        }
    }
}
