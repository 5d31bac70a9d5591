//! Honeypot agent service entry point.
//!
//! Wires configuration, the session store and its eviction sweep, the
//! persona responder, the optional report callback, and the HTTP
//! boundary, then serves until interrupted.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use honeypot_agent::adapters::http::middleware::ApiKeyAuth;
use honeypot_agent::adapters::http::{honeypot_router, AppState};
use honeypot_agent::adapters::{
    HttpIntelReporter, InMemorySessionStore, MockPersonaResponder, OpenAiResponder,
};
use honeypot_agent::application::{OrchestratorConfig, SessionOrchestrator};
use honeypot_agent::config::AppConfig;
use honeypot_agent::ports::{IntelReporter, PersonaResponder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    config.validate()?;

    // Session store plus its background eviction sweep.
    let store = Arc::new(InMemorySessionStore::new(config.session.store_config()));
    let sweep = InMemorySessionStore::spawn_sweep(Arc::clone(&store), config.session.sweep_interval());

    // Responder: real upstream when a key is configured, scripted
    // otherwise so the service stays demoable without one.
    let responder: Arc<dyn PersonaResponder> = match config.responder.adapter_config() {
        Some(responder_config) => {
            tracing::info!(model = %responder_config.model, "using OpenAI-compatible responder");
            Arc::new(OpenAiResponder::new(responder_config)?)
        }
        None => {
            tracing::warn!("no responder API key configured, using scripted replies");
            Arc::new(MockPersonaResponder::new())
        }
    };

    let reporter: Option<Arc<dyn IntelReporter>> = match config.report.callback_url.as_deref() {
        Some(url) if config.report.enabled() => {
            tracing::info!(callback_url = url, "engagement reporting enabled");
            Some(Arc::new(HttpIntelReporter::new(url, config.report.timeout())?))
        }
        _ => {
            tracing::info!("engagement reporting disabled");
            None
        }
    };

    let orchestrator = Arc::new(SessionOrchestrator::new(
        Arc::clone(&store),
        responder,
        reporter,
        OrchestratorConfig {
            report_threshold: config.report.message_threshold,
            ..OrchestratorConfig::default()
        },
    ));

    let auth_key = config
        .auth
        .api_key()
        .ok_or("auth.api_key must be set")?;
    let auth = ApiKeyAuth::new(auth_key);

    let app = honeypot_router(AppState::new(orchestrator), auth).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            ))),
    );

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "honeypot agent listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweep.abort();
    store.clear().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Builds the CORS layer; with no configured origins any origin is
/// allowed, matching the open posture of the evaluation harness.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
