//! Redis-backed atomic counter rate limiter.
//!
//! Uses a fixed-window counter with Redis INCR + PEXPIRE. Unlike the
//! record-based limiter, concurrent requests never under-count: INCR is
//! atomic on the server.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::cache::map_redis_error;
use crate::domain::rate_limit::{RateLimitPolicy, RateWindowState};
use crate::ports::{
    Clock, RateLimitError, RateLimitKey, RateLimitResult, RateLimiter, StoreError,
};

use super::config::FailurePolicy;
use super::fixed_window::{window_result, DEFAULT_STORE_TIMEOUT};

/// Redis rate limiter for exact per-window counting.
///
/// 1. INCR the key
/// 2. If the count is 1, or the key has no expiry, PEXPIRE it for the window
/// 3. If the count exceeds the limit, deny
///
/// Requests denied inside the window still increment the counter; the
/// window end does not move, so this does not extend the penalty.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    clock: Arc<dyn Clock>,
    key_prefix: String,
    failure_policy: FailurePolicy,
    store_timeout: Duration,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            conn,
            clock,
            key_prefix: String::new(),
            failure_policy: FailurePolicy::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    fn counter_key(&self, key: &RateLimitKey) -> String {
        counter_key(&self.key_prefix, key)
    }

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

    /// Increments the counter and returns the raw `(count, pttl)` pair.
    async fn increment(&self, redis_key: &str, window_ms: u64) -> Result<(i64, i64), StoreError> {
        let mut conn = self.conn.clone();

        let count: i64 = conn.incr(redis_key, 1_i64).await.map_err(map_redis_error)?;

        let ttl_ms: i64 = conn.pttl(redis_key).await.map_err(map_redis_error)?;
        if needs_expiry(count, ttl_ms) {
            conn.pexpire::<_, ()>(redis_key, window_ms as i64)
                .await
                .map_err(map_redis_error)?;
        }

        Ok((count, ttl_ms))
    }
}

/// Counter keys live apart from window records so switching strategies
/// never makes INCR hit a JSON value.
fn counter_key(prefix: &str, key: &RateLimitKey) -> String {
    format!("{}count:{}", prefix, key.to_store_key())
}

/// A fresh counter, or one that lost its expiry, gets a full window.
fn needs_expiry(count: i64, ttl_ms: i64) -> bool {
    count == 1 || ttl_ms < 0
}

/// Maps an INCR count and the PTTL read after it onto the port result.
///
/// A negative PTTL means the key had no expiry (-1) or vanished (-2); both
/// are re-expired for a full window by `increment`.
fn counter_result(count: i64, ttl_ms: i64, policy: &RateLimitPolicy, now_ms: u64) -> RateLimitResult {
    let count = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
    let remaining_ms = if needs_expiry(i64::from(count), ttl_ms) {
        policy.window_ms
    } else {
        ttl_ms as u64
    };
    let state = RateWindowState {
        count: count.min(policy.limit),
        expires_at: now_ms.saturating_add(remaining_ms),
    };
    window_result(count <= policy.limit, state, policy, now_ms)
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn admit(
        &self,
        key: &RateLimitKey,
        policy: Option<&RateLimitPolicy>,
    ) -> Result<RateLimitResult, RateLimitError> {
        let Some(policy) = policy else {
            return Ok(RateLimitResult::Unrestricted);
        };

        let redis_key = self.counter_key(key);
        let (count, ttl_ms) = match self
            .bounded(self.increment(&redis_key, policy.window_ms))
            .await
        {
            Ok(counted) => counted,
            Err(err) => return self.failure_policy.resolve(key, err),
        };

        let result = counter_result(count, ttl_ms, policy, self.clock.now_millis());
        if result.is_denied() {
            tracing::info!(key = %key, limit = policy.limit, "Rate limit exceeded");
        }
        Ok(result)
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("key_prefix", &self.key_prefix)
            .field("failure_policy", &self.failure_policy)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    fn policy(limit: u32, window_ms: u64) -> RateLimitPolicy {
        RateLimitPolicy::new(limit, window_ms).unwrap()
    }

    #[test]
    fn counter_key_is_namespaced_under_prefix() {
        let key = RateLimitKey::new("10.0.0.1", "login");
        assert_eq!(counter_key("", &key), "count:10.0.0.1:login");
        assert_eq!(counter_key("taskflow:", &key), "taskflow:count:10.0.0.1:login");
    }

    #[test]
    fn expiry_is_set_on_first_hit_or_when_missing() {
        assert!(needs_expiry(1, -2));
        assert!(needs_expiry(1, 60_000));
        assert!(needs_expiry(4, -1));
        assert!(!needs_expiry(4, 12_000));
    }

    #[test]
    fn count_at_limit_is_admitted_with_nothing_left() {
        match counter_result(3, 8_000, &policy(3, 10_000), NOW) {
            RateLimitResult::Allowed(status) => {
                assert_eq!(status.limit, 3);
                assert_eq!(status.remaining, 0);
                assert_eq!(status.reset_at.as_unix_millis(), NOW + 8_000);
            }
            other => panic!("expected Allowed, got {:?}", other),
        }
    }

    #[test]
    fn count_past_limit_is_denied_until_window_end() {
        match counter_result(4, 2_500, &policy(3, 10_000), NOW) {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.limit, 3);
                assert_eq!(denied.retry_after_secs, 3);
            }
            other => panic!("expected Denied, got {:?}", other),
        }
    }

    #[test]
    fn missing_ttl_counts_as_a_full_window() {
        match counter_result(1, -2, &policy(5, 60_000), NOW) {
            RateLimitResult::Allowed(status) => {
                assert_eq!(status.remaining, 4);
                assert_eq!(status.reset_at.as_unix_millis(), NOW + 60_000);
            }
            other => panic!("expected Allowed, got {:?}", other),
        }

        match counter_result(7, -1, &policy(5, 60_000), NOW) {
            RateLimitResult::Denied(denied) => assert_eq!(denied.retry_after_secs, 60),
            other => panic!("expected Denied, got {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore = "Requires live Redis at REDIS_URL"]
    async fn live_redis_counts_exactly() {
        use crate::adapters::clock::SystemClock;

        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
        let client = redis::Client::open(url).unwrap();
        let conn = client.get_multiplexed_tokio_connection().await.unwrap();
        let limiter = RedisRateLimiter::new(conn, Arc::new(SystemClock))
            .with_key_prefix(format!("taskflow-test:{}:", uuid::Uuid::new_v4()));
        let key = RateLimitKey::new("live", "login");
        let policy = policy(2, 5_000);

        assert!(limiter.admit(&key, Some(&policy)).await.unwrap().is_allowed());
        assert!(limiter.admit(&key, Some(&policy)).await.unwrap().is_allowed());
        assert!(limiter.admit(&key, Some(&policy)).await.unwrap().is_denied());
    }
}
