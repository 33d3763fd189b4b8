//! Background job configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Task status worker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Run the status worker in this process
    #[serde(default = "default_worker_enabled")]
    pub worker_enabled: bool,

    /// Longest a blocking pop waits before re-checking for shutdown
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl JobsConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 60 {
            return Err(ValidationError::InvalidPollTimeout);
        }
        Ok(())
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            worker_enabled: default_worker_enabled(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_worker_enabled() -> bool {
    true
}

fn default_poll_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_config_defaults() {
        let config = JobsConfig::default();
        assert!(config.worker_enabled);
        assert_eq!(config.poll_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_poll_timeout_bounds() {
        let config = JobsConfig {
            poll_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPollTimeout));
    }
}
