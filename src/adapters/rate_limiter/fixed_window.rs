//! Store-backed fixed-window rate limiter.
//!
//! Keeps one JSON window record per `(identifier, operation)` in any
//! `KeyValueStore`: one read, a pure decision, and at most one write.
//!
//! The read-modify-write is not compare-and-set. Concurrent requests on the
//! same key may both observe the same count, so enforcement is approximate.
//! Use `RedisRateLimiter` when exact counts matter.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::rate_limit::{ttl_secs_ceil, RateLimitPolicy, RateWindowState, WindowDecision};
use crate::ports::{
    Clock, KeyValueStore, RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult,
    RateLimitStatus, RateLimiter, StoreError,
};

use super::config::FailurePolicy;

/// Default bound on each store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(250);

/// Fixed-window limiter over a key-value store.
pub struct FixedWindowRateLimiter {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    failure_policy: FailurePolicy,
    store_timeout: Duration,
}

impl FixedWindowRateLimiter {
    /// Create a limiter that fails open with the default store timeout.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            failure_policy: FailurePolicy::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    /// Runs a store call under the configured timeout.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "timed out after {}ms",
                self.store_timeout.as_millis()
            ))),
        }
    }

    async fn read_state(
        &self,
        key: &RateLimitKey,
        store_key: &str,
    ) -> Result<Option<RateWindowState>, StoreError> {
        let raw = self.bounded(self.store.get(store_key)).await?;
        Ok(raw.and_then(|raw| {
            let state = RateWindowState::decode(&raw);
            if state.is_none() {
                tracing::debug!(key = %key, "Malformed rate window record, starting a new window");
            }
            state
        }))
    }
}

/// Converts a window outcome into the port's result type.
pub(crate) fn window_result(
    admitted: bool,
    state: RateWindowState,
    policy: &RateLimitPolicy,
    now_ms: u64,
) -> RateLimitResult {
    let reset_at = Timestamp::from_unix_millis(state.expires_at);

    if admitted {
        RateLimitResult::Allowed(RateLimitStatus {
            limit: policy.limit,
            remaining: policy.limit.saturating_sub(state.count),
            reset_at,
            window_ms: policy.window_ms,
        })
    } else {
        let retry_after_secs = ttl_secs_ceil(state.remaining_ms(now_ms));
        RateLimitResult::Denied(RateLimitDenied {
            limit: policy.limit,
            retry_after_secs,
            reset_at,
            message: format!(
                "Too many requests. Retry after {} seconds.",
                retry_after_secs
            ),
        })
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn admit(
        &self,
        key: &RateLimitKey,
        policy: Option<&RateLimitPolicy>,
    ) -> Result<RateLimitResult, RateLimitError> {
        let Some(policy) = policy else {
            return Ok(RateLimitResult::Unrestricted);
        };

        let store_key = key.to_store_key();
        let current = match self.read_state(key, &store_key).await {
            Ok(state) => state,
            Err(err) => return self.failure_policy.resolve(key, err),
        };

        let now_ms = self.clock.now_millis();
        let decision = WindowDecision::evaluate(current, policy, now_ms);

        if let Some((state, ttl_secs)) = decision.write() {
            let encoded = state.encode();
            let write = self.store.set(&store_key, &encoded, ttl_secs);
            if let Err(err) = self.bounded(write).await {
                return self.failure_policy.resolve(key, err);
            }
        } else {
            tracing::info!(
                key = %key,
                limit = policy.limit,
                window_ms = policy.window_ms,
                "Rate limit exceeded"
            );
        }

        Ok(window_result(
            decision.is_admitted(),
            decision.state(),
            policy,
            now_ms,
        ))
    }
}

impl std::fmt::Debug for FixedWindowRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowRateLimiter")
            .field("failure_policy", &self.failure_policy)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}
