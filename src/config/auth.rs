//! API key authentication configuration

use secrecy::Secret;
use serde::Deserialize;

use super::error::ValidationError;

/// Shared-secret authentication configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Static API key expected in the `x-api-key` header
    pub api_key: Option<String>,
}

impl AuthConfig {
    /// The configured key, wrapped for downstream use
    pub fn api_key(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .map(|k| Secret::new(k.clone()))
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key().is_none() {
            return Err(ValidationError::MissingRequired("HONEYPOT__AUTH__API_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_validation() {
        assert!(AuthConfig::default().validate().is_err());
        let config = AuthConfig {
            api_key: Some(String::new()),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn present_key_validates() {
        let config = AuthConfig {
            api_key: Some("hunter2".to_string()),
        };
        assert!(config.validate().is_ok());
        assert!(config.api_key().is_some());
    }
}
