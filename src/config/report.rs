//! Final-result report configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the engagement report callback
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Collection endpoint; reporting is disabled when unset
    pub callback_url: Option<String>,

    /// Delivery timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Total message count that arms the one-shot report
    #[serde(default = "default_message_threshold")]
    pub message_threshold: usize,
}

impl ReportConfig {
    /// Check if reporting is enabled
    pub fn enabled(&self) -> bool {
        self.callback_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Delivery timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate report configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.callback_url.as_ref().filter(|u| !u.is_empty()) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidCallbackUrl);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            callback_url: None,
            timeout_secs: default_timeout(),
            message_threshold: default_message_threshold(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_message_threshold() -> usize {
    10
}
