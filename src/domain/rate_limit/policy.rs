//! Rate limit policy value object.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

/// A `(limit, window)` pair attached to one protected operation.
///
/// At most `limit` requests per identifier are admitted in each window of
/// `window_ms` milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window_ms: u64,
}

impl RateLimitPolicy {
    /// Creates a validated policy.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if limit or window is zero
    pub fn new(limit: u32, window_ms: u64) -> Result<Self, ValidationError> {
        let policy = Self { limit, window_ms };
        policy.validate()?;
        Ok(policy)
    }

    /// Convenience constructor for per-minute policies.
    pub fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            window_ms: 60_000,
        }
    }

    /// Checks the policy bounds. Deserialized policies skip `new`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if self.window_ms == 0 {
            return Err(ValidationError::out_of_range("window_ms", 1, i64::MAX, 0));
        }
        Ok(())
    }

    /// Window length as a store TTL, in whole seconds rounded up.
    pub fn window_ttl_secs(&self) -> u64 {
        ttl_secs_ceil(self.window_ms)
    }
}

/// Converts a millisecond duration into a store TTL.
///
/// Rounds up so a sub-second remainder never truncates to zero, which most
/// stores interpret as "no expiry" or reject outright.
pub fn ttl_secs_ceil(millis: u64) -> u64 {
    millis.div_ceil(1000).max(1)
}
