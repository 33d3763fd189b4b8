//! Rate limit configuration types.
//!
//! The policy table maps stable operation names to `(limit, window)` pairs.
//! It is built once at startup and consulted when routes are assembled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::rate_limit::RateLimitPolicy;
use crate::ports::{RateLimitError, RateLimitKey, RateLimitResult, StoreError};

/// Stable names of protected operations.
pub mod operations {
    pub const REGISTER: &str = "register";
    pub const LOGIN: &str = "login";
    pub const REFRESH_TOKENS: &str = "refresh_tokens";
    pub const CREATE_USER: &str = "create_user";
    pub const CREATE_TASK: &str = "create_task";
    pub const LIST_TASKS: &str = "list_tasks";
    pub const TASK_STATS: &str = "task_stats";
    pub const GET_TASK: &str = "get_task";
    pub const UPDATE_TASK: &str = "update_task";
    pub const UPDATE_TASK_STATUS: &str = "update_task_status";
    pub const REMOVE_TASK: &str = "remove_task";
    pub const BATCH_PROCESS_TASKS: &str = "batch_process_tasks";
}

/// What the limiter does when its store cannot be consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Admit the request and log a warning.
    #[default]
    FailOpen,
    /// Reject with a service-unavailable error.
    FailClosed,
}

impl FailurePolicy {
    /// Resolves a store failure into a limiter outcome.
    pub fn resolve(
        &self,
        key: &RateLimitKey,
        err: StoreError,
    ) -> Result<RateLimitResult, RateLimitError> {
        match self {
            FailurePolicy::FailOpen => {
                tracing::warn!(
                    key = %key,
                    error = %err,
                    "Rate limit store failed, admitting request (fail open)"
                );
                Ok(RateLimitResult::Bypassed)
            }
            FailurePolicy::FailClosed => {
                tracing::warn!(
                    key = %key,
                    error = %err,
                    "Rate limit store failed, rejecting request (fail closed)"
                );
                Err(RateLimitError::StoreUnavailable(err.to_string()))
            }
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail_open" => Ok(FailurePolicy::FailOpen),
            "fail_closed" => Ok(FailurePolicy::FailClosed),
            other => Err(ValidationError::invalid_format(
                "failure_policy",
                format!("expected fail_open or fail_closed, got '{}'", other),
            )),
        }
    }
}

/// Which limiter implementation backs the policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStrategy {
    /// JSON window records in the key-value store (read, decide, write).
    #[default]
    Record,
    /// Redis `INCR` + `PEXPIRE`, exact under concurrency.
    AtomicCounter,
}

impl fmt::Display for RateLimitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitStrategy::Record => f.write_str("record"),
            RateLimitStrategy::AtomicCounter => f.write_str("atomic_counter"),
        }
    }
}

/// Operation name to policy table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitPolicies {
    policies: HashMap<String, RateLimitPolicy>,
}

impl RateLimitPolicies {
    /// An empty table; every operation is unrestricted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Stock limits for the protected operations.
    pub fn defaults() -> Self {
        use operations::*;
        Self::none()
            .with(REGISTER, RateLimitPolicy::per_minute(5))
            .with(LOGIN, RateLimitPolicy::per_minute(10))
            .with(REFRESH_TOKENS, RateLimitPolicy::per_minute(20))
            .with(CREATE_TASK, RateLimitPolicy::per_minute(30))
            .with(BATCH_PROCESS_TASKS, RateLimitPolicy::per_minute(10))
    }

    /// Builder: set or replace the policy for an operation.
    pub fn with(mut self, operation: impl Into<String>, policy: RateLimitPolicy) -> Self {
        self.policies.insert(operation.into(), policy);
        self
    }

    /// Builder: make an operation unrestricted.
    pub fn without(mut self, operation: &str) -> Self {
        self.policies.remove(operation);
        self
    }

    pub fn get(&self, operation: &str) -> Option<&RateLimitPolicy> {
        self.policies.get(operation)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Validates every entry.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (operation, policy) in &self.policies {
            if operation.trim().is_empty() {
                return Err(ValidationError::empty_field("operation"));
            }
            policy.validate()?;
        }
        Ok(())
    }
}

impl FromIterator<(String, RateLimitPolicy)> for RateLimitPolicies {
    fn from_iter<I: IntoIterator<Item = (String, RateLimitPolicy)>>(iter: I) -> Self {
        Self {
            policies: iter.into_iter().collect(),
        }
    }
}
