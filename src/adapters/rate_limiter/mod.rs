//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port for different backends.
//!
//! ## Available Adapters
//!
//! - `FixedWindowRateLimiter` - JSON window records in any `KeyValueStore`
//! - `RedisRateLimiter` - Atomic INCR counter for exact counting
//!
//! ## Usage
//!
//! ```ignore
//! use taskflow::adapters::rate_limiter::{FixedWindowRateLimiter, FailurePolicy};
//!
//! // For testing
//! let store = Arc::new(InMemoryKeyValueStore::new(clock.clone()));
//! let limiter = FixedWindowRateLimiter::new(store, clock);
//!
//! // For production
//! let limiter = FixedWindowRateLimiter::new(Arc::new(redis_store), clock)
//!     .with_failure_policy(FailurePolicy::FailClosed);
//! ```

mod config;
mod fixed_window;
mod redis;

pub use config::{operations, FailurePolicy, RateLimitPolicies, RateLimitStrategy};
pub use fixed_window::{FixedWindowRateLimiter, DEFAULT_STORE_TIMEOUT};
pub use self::redis::RedisRateLimiter;
