//! Persona responder configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ResponderConfig;

/// Configuration for the OpenAI-compatible reply generator
#[derive(Debug, Clone, Deserialize)]
pub struct ResponderSettings {
    /// API key; when absent the service runs with the scripted responder
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl ResponderSettings {
    /// Check if a usable API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Builds the adapter configuration; `None` without an API key
    pub fn adapter_config(&self) -> Option<ResponderConfig> {
        let key = self.api_key.as_ref().filter(|k| !k.is_empty())?;
        Some(
            ResponderConfig::new(key.clone())
                .with_model(self.model.clone())
                .with_base_url(self.base_url.clone())
                .with_timeout(Duration::from_secs(self.timeout_secs))
                .with_max_retries(self.max_retries),
        )
    }

    /// Validate responder configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_without_key() {
        let config = ResponderSettings::default();
        assert!(config.validate().is_ok());
        assert!(!config.has_api_key());
        assert!(config.adapter_config().is_none());
    }

    #[test]
    fn adapter_config_built_from_settings() {
        let config = ResponderSettings {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let adapter = config.adapter_config().unwrap();
        assert_eq!(adapter.model, "gpt-4o-mini");
        assert_eq!(adapter.timeout, Duration::from_secs(10));
    }

    #[test]
    fn bad_base_url_rejected() {
        let config = ResponderSettings {
            base_url: "ftp://nope".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
