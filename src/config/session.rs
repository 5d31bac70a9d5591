//! Session store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::SessionStoreConfig;

/// Session lifecycle and locking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Inactivity window in seconds before a session is evicted
    #[serde(default = "default_idle_window")]
    pub idle_window_secs: u64,

    /// How often the eviction sweep runs, in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Per-attempt session lock timeout in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Bounded lock attempts before surfacing contention
    #[serde(default = "default_lock_attempts")]
    pub lock_attempts: u32,
}

impl SessionConfig {
    /// Sweep cadence as a Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Converts into the store's tuning struct
    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            idle_window_secs: self.idle_window_secs,
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            lock_attempts: self.lock_attempts,
        }
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_window_secs == 0 || self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidIdleWindow);
        }
        if self.lock_attempts == 0 || self.lock_timeout_ms == 0 {
            return Err(ValidationError::InvalidLockBudget);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_window_secs: default_idle_window(),
            sweep_interval_secs: default_sweep_interval(),
            lock_timeout_ms: default_lock_timeout_ms(),
            lock_attempts: default_lock_attempts(),
        }
    }
}

fn default_idle_window() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    300
}

fn default_lock_timeout_ms() -> u64 {
    250
}

fn default_lock_attempts() -> u32 {
    3
}
