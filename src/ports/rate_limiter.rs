//! Rate limiting port for protected operations.
//!
//! This port defines the interface for admitting requests under a fixed-window
//! counter. Implementations can keep window records in any key-value store or
//! use an atomic counter in Redis.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::rate_limit::{window_key, RateLimitPolicy};

/// Port for rate limiting operations.
///
/// Implementations should be thread-safe and support concurrent access.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if a request is allowed, counting it if so.
    ///
    /// With no policy the request is admitted without touching the store.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` only when the limiter fails closed and the store
    ///   could not be consulted
    async fn admit(
        &self,
        key: &RateLimitKey,
        policy: Option<&RateLimitPolicy>,
    ) -> Result<RateLimitResult, RateLimitError>;
}

/// Key identifying what to rate limit: who is calling and which operation.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    /// Caller identity (user id, network address, or "anonymous").
    pub identifier: String,
    /// Stable operation name, never per-request data.
    pub operation: String,
}

impl RateLimitKey {
    pub fn new(identifier: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            operation: operation.into(),
        }
    }

    /// Creates a key scoped to an authenticated user.
    pub fn user(user_id: &UserId, operation: &str) -> Self {
        Self::new(user_id.to_string(), operation)
    }

    /// Creates a key scoped to a client address.
    pub fn ip(ip: &str, operation: &str) -> Self {
        Self::new(ip, operation)
    }

    /// Returns the store key, `"<identifier>:<operation>"`.
    pub fn to_store_key(&self) -> String {
        window_key(&self.identifier, &self.operation)
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.identifier, self.operation)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed; includes current status.
    Allowed(RateLimitStatus),
    /// No policy applies to this operation.
    Unrestricted,
    /// Store could not be consulted and the limiter fails open.
    Bypassed,
    /// Request is denied; includes denial details.
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    /// Returns true if the request was allowed.
    pub fn is_allowed(&self) -> bool {
        !self.is_denied()
    }

    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: Timestamp,
    pub window_ms: u64,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Seconds until the client should retry, at least 1.
    pub retry_after_secs: u64,
    pub reset_at: Timestamp,
    /// Human-readable message explaining the denial.
    pub message: String,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RateLimitError {
    /// Backing store failed or timed out while failing closed.
    #[error("rate limiter store unavailable: {0}")]
    StoreUnavailable(String),
}
