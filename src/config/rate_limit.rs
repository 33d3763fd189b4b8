//! Rate limit configuration
//!
//! Per-operation overrides are read from nested keys, e.g.
//! `TASKFLOW__RATE_LIMIT__POLICIES__LOGIN__LIMIT=20`.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::rate_limiter::{FailurePolicy, RateLimitPolicies, RateLimitStrategy};
use crate::domain::rate_limit::RateLimitPolicy;

/// Override for one operation's policy.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PolicyOverride {
    pub limit: u32,

    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// `false` removes the operation from the table, leaving it unrestricted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Rate limiter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Limiter implementation
    #[serde(default)]
    pub strategy: RateLimitStrategy,

    /// Behavior when the store is unreachable or slow
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Upper bound on each store round trip
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Start from the stock policy table before applying overrides
    #[serde(default = "default_enabled")]
    pub use_defaults: bool,

    /// Per-operation overrides keyed by operation name
    #[serde(default)]
    pub policies: HashMap<String, PolicyOverride>,
}

impl RateLimitConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Builds the operation-to-policy table used at route assembly.
    pub fn policy_table(&self) -> RateLimitPolicies {
        let base = if self.use_defaults {
            RateLimitPolicies::defaults()
        } else {
            RateLimitPolicies::none()
        };

        self.policies.iter().fold(base, |table, (operation, entry)| {
            if entry.enabled {
                table.with(
                    operation.clone(),
                    RateLimitPolicy {
                        limit: entry.limit,
                        window_ms: entry.window_ms,
                    },
                )
            } else {
                table.without(operation)
            }
        })
    }

    /// Validate rate limit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_timeout_ms == 0 || self.store_timeout_ms > 10_000 {
            return Err(ValidationError::InvalidStoreTimeout);
        }
        for (operation, entry) in &self.policies {
            if !entry.enabled {
                continue;
            }
            let policy = RateLimitPolicy {
                limit: entry.limit,
                window_ms: entry.window_ms,
            };
            policy
                .validate()
                .map_err(|e| ValidationError::InvalidRateLimitPolicy {
                    operation: operation.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            strategy: RateLimitStrategy::default(),
            failure_policy: FailurePolicy::default(),
            store_timeout_ms: default_store_timeout_ms(),
            use_defaults: true,
            policies: HashMap::new(),
        }
    }
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_enabled() -> bool {
    true
}

fn default_store_timeout_ms() -> u64 {
    250
}
