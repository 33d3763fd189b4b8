//! Behavioral tests for the fixed-window rate limiter.
//!
//! Drives `FixedWindowRateLimiter` over the in-memory store with a manual
//! clock, covering the documented scenarios and randomized invariants.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;

use taskflow::adapters::cache::InMemoryKeyValueStore;
use taskflow::adapters::clock::ManualClock;
use taskflow::adapters::rate_limiter::{FailurePolicy, FixedWindowRateLimiter};
use taskflow::domain::rate_limit::{RateLimitPolicy, RateWindowState};
use taskflow::ports::{
    KeyValueStore, RateLimitError, RateLimitKey, RateLimitResult, RateLimiter, StoreError,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const START_MS: u64 = 1_700_000_000_000;

struct Harness {
    clock: ManualClock,
    store: Arc<InMemoryKeyValueStore>,
    limiter: FixedWindowRateLimiter,
}

impl Harness {
    fn new() -> Self {
        let clock = ManualClock::new(START_MS);
        let store = Arc::new(InMemoryKeyValueStore::new(Arc::new(clock.clone())));
        let limiter = FixedWindowRateLimiter::new(store.clone(), Arc::new(clock.clone()));
        Self {
            clock,
            store,
            limiter,
        }
    }

    /// Moves the clock to `offset_ms` after the start.
    fn at(&self, offset_ms: u64) {
        self.clock.set(START_MS + offset_ms);
    }

    async fn admit(&self, key: &RateLimitKey, policy: Option<&RateLimitPolicy>) -> bool {
        self.limiter
            .admit(key, policy)
            .await
            .expect("in-memory store never fails")
            .is_allowed()
    }

    async fn stored(&self, key: &RateLimitKey) -> Option<RateWindowState> {
        self.store
            .get(&key.to_store_key())
            .await
            .unwrap()
            .and_then(|raw| RateWindowState::decode(&raw))
    }
}

fn policy(limit: u32, window_ms: u64) -> RateLimitPolicy {
    RateLimitPolicy::new(limit, window_ms).unwrap()
}

/// Store whose every call fails, counting attempts.
#[derive(Default)]
struct UnreachableStore {
    calls: AtomicUsize,
}

impl UnreachableStore {
    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::Unavailable("connection refused".to_string())
    }
}

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(self.fail())
    }
    async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(self.fail())
    }
    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(self.fail())
    }
    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        Err(self.fail())
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn three_per_second_window_admits_rejects_then_resets() {
    let h = Harness::new();
    let key = RateLimitKey::new("user-1", "create-item");
    let policy = policy(3, 1000);

    for (offset, expected_count) in [(0, 1), (100, 2), (200, 3)] {
        h.at(offset);
        assert!(h.admit(&key, Some(&policy)).await, "t={} should admit", offset);
        let state = h.stored(&key).await.unwrap();
        assert_eq!(state.count, expected_count);
        assert_eq!(state.expires_at, START_MS + 1000);
    }

    h.at(300);
    let denied = h.limiter.admit(&key, Some(&policy)).await.unwrap();
    match denied {
        RateLimitResult::Denied(d) => {
            assert_eq!(d.limit, 3);
            assert_eq!(d.retry_after_secs, 1);
        }
        other => panic!("expected Denied, got {:?}", other),
    }
    assert_eq!(h.stored(&key).await.unwrap().count, 3);

    h.at(1050);
    assert!(h.admit(&key, Some(&policy)).await);
    let state = h.stored(&key).await.unwrap();
    assert_eq!(state.count, 1);
    assert_eq!(state.expires_at, START_MS + 2050);
}

#[tokio::test]
async fn operation_without_policy_admits_a_thousand_calls() {
    let h = Harness::new();
    let key = RateLimitKey::new("user-1", "list-items");

    for _ in 0..1000 {
        assert!(h.admit(&key, None).await);
    }
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn repeated_post_expiry_calls_each_open_a_fresh_window() {
    let h = Harness::new();
    let key = RateLimitKey::new("10.0.0.1", "login");
    let policy = policy(2, 500);

    for round in 0..5u64 {
        h.at(round * 10_000);
        assert!(h.admit(&key, Some(&policy)).await);
        assert_eq!(h.stored(&key).await.unwrap().count, 1);
    }
}

#[tokio::test]
async fn malformed_record_is_replaced_by_a_fresh_window() {
    let h = Harness::new();
    let key = RateLimitKey::new("user-1", "login");
    h.store
        .set(&key.to_store_key(), "{not json", 60)
        .await
        .unwrap();

    let result = h.limiter.admit(&key, Some(&policy(5, 60_000))).await.unwrap();

    match result {
        RateLimitResult::Allowed(status) => assert_eq!(status.remaining, 4),
        other => panic!("expected Allowed, got {:?}", other),
    }
    assert_eq!(h.stored(&key).await.unwrap().count, 1);
}

#[tokio::test]
async fn identifiers_and_operations_do_not_interfere() {
    let h = Harness::new();
    let policy = policy(1, 60_000);
    let alice_login = RateLimitKey::new("alice", "login");
    let bob_login = RateLimitKey::new("bob", "login");
    let alice_register = RateLimitKey::new("alice", "register");

    assert!(h.admit(&alice_login, Some(&policy)).await);
    assert!(!h.admit(&alice_login, Some(&policy)).await);

    assert!(h.admit(&bob_login, Some(&policy)).await);
    assert!(h.admit(&alice_register, Some(&policy)).await);
}

#[tokio::test]
async fn window_record_survives_between_admits() {
    let h = Harness::new();
    let key = RateLimitKey::new("alice", "login");
    let policy = policy(3, 60_000);

    assert!(h.admit(&key, Some(&policy)).await);
    h.at(500);
    assert!(h.admit(&key, Some(&policy)).await);

    let state = h.stored(&key).await.expect("window record written");
    assert_eq!(state.count, 2);
    assert_eq!(state.expires_at, START_MS + 60_000);
}

#[tokio::test]
async fn unreachable_store_fails_open_consistently() {
    let store = Arc::new(UnreachableStore::default());
    let limiter =
        FixedWindowRateLimiter::new(store.clone(), Arc::new(ManualClock::new(START_MS)));
    let key = RateLimitKey::new("alice", "login");

    for _ in 0..10 {
        let result = limiter.admit(&key, Some(&policy(1, 1000))).await.unwrap();
        assert!(matches!(result, RateLimitResult::Bypassed));
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn unreachable_store_fails_closed_consistently() {
    let limiter = FixedWindowRateLimiter::new(
        Arc::new(UnreachableStore::default()),
        Arc::new(ManualClock::new(START_MS)),
    )
    .with_failure_policy(FailurePolicy::FailClosed);
    let key = RateLimitKey::new("alice", "login");

    for _ in 0..10 {
        let err = limiter.admit(&key, Some(&policy(1, 1000))).await.unwrap_err();
        assert!(matches!(err, RateLimitError::StoreUnavailable(_)));
    }
}

// =============================================================================
// Properties
// =============================================================================

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Within one window exactly the first `limit` calls are admitted.
    #[test]
    fn burst_admits_exactly_limit(limit in 1u32..20, window_ms in 1u64..120_000, calls in 0usize..50) {
        let admitted = block_on(async {
            let h = Harness::new();
            let key = RateLimitKey::new("burst", "op");
            let policy = policy(limit, window_ms);
            let mut admitted = 0usize;
            for _ in 0..calls {
                if h.admit(&key, Some(&policy)).await {
                    admitted += 1;
                }
            }
            admitted
        });

        prop_assert_eq!(admitted, calls.min(limit as usize));
    }

    /// No window ever admits more than `limit` calls, whatever the spacing.
    #[test]
    fn windows_never_exceed_limit(
        limit in 1u32..6,
        window_ms in 100u64..5_000,
        gaps in prop::collection::vec(0u64..2_000, 1..60),
    ) {
        let per_window = block_on(async {
            let h = Harness::new();
            let key = RateLimitKey::new("spaced", "op");
            let policy = policy(limit, window_ms);
            let mut per_window: HashMap<u64, u32> = HashMap::new();
            let mut offset = 0u64;
            for gap in gaps {
                offset += gap;
                h.at(offset);
                if h.admit(&key, Some(&policy)).await {
                    let state = h.stored(&key).await.unwrap();
                    *per_window.entry(state.expires_at).or_default() += 1;
                }
            }
            per_window
        });

        for admitted in per_window.values() {
            prop_assert!(*admitted <= limit);
        }
    }

    /// Interleaving a second identifier never changes the first one's outcomes.
    #[test]
    fn interleaved_identifiers_match_isolated_runs(
        limit in 1u32..8,
        pattern in prop::collection::vec(any::<bool>(), 1..40),
    ) {
        let (interleaved, isolated) = block_on(async {
            let policy = policy(limit, 60_000);
            let a = RateLimitKey::new("a", "op");
            let b = RateLimitKey::new("b", "op");

            let shared = Harness::new();
            let mut interleaved = Vec::new();
            for &hit_b in &pattern {
                if hit_b {
                    shared.admit(&b, Some(&policy)).await;
                } else {
                    interleaved.push(shared.admit(&a, Some(&policy)).await);
                }
            }

            let alone = Harness::new();
            let mut isolated = Vec::new();
            for _ in pattern.iter().filter(|hit_b| !**hit_b) {
                isolated.push(alone.admit(&a, Some(&policy)).await);
            }
            (interleaved, isolated)
        });

        prop_assert_eq!(interleaved, isolated);
    }
}
