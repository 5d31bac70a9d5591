//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `HONEYPOT`
//! prefix; nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use honeypot_agent::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod error;
mod report;
mod responder;
mod server;
mod session;

pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use report::ReportConfig;
pub use responder::ResponderSettings;
pub use server::ServerConfig;
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (bind address, timeouts, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared-secret authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Session lifecycle and locking
    #[serde(default)]
    pub session: SessionConfig,

    /// Persona responder (OpenAI-compatible)
    #[serde(default)]
    pub responder: ResponderSettings,

    /// Final-result report callback
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `HONEYPOT` prefix. `HONEYPOT__SERVER__PORT=8000` maps to
    /// `server.port`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HONEYPOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.session.validate()?;
        self.responder.validate()?;
        self.report.validate()?;
        Ok(())
    }
}
