//! Redis connection settings.
//!
//! One multiplexed connection backs the rate limit store and the job queue
//! producer; the status worker opens its own for blocking pops.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings under `TASKFLOW__REDIS__*`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// `redis://` or `rediss://` URL.
    pub url: String,

    /// Seconds allowed for the initial connection.
    pub timeout_secs: u64,

    /// Namespace for every key this service writes, e.g. `taskflow:login:...`.
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 5,
            key_prefix: "taskflow:".to_string(),
        }
    }
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.url.split_once("://") {
            _ if self.url.is_empty() => {
                Err(ValidationError::MissingRequired("TASKFLOW__REDIS__URL"))
            }
            Some(("redis" | "rediss", _)) if self.timeout_secs == 0 => {
                Err(ValidationError::InvalidTimeout)
            }
            Some(("redis" | "rediss", _)) => Ok(()),
            _ => Err(ValidationError::InvalidRedisUrl),
        }
    }
}
