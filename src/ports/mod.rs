//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Rate Limiting Ports
//!
//! - `RateLimiter` - Admit or reject a request for an operation
//! - `KeyValueStore` - TTL-expiring store holding window records
//! - `Clock` - Time source for window arithmetic
//!
//! ## Persistence Ports
//!
//! - `UserRepository` - User accounts
//! - `TaskRepository` - Owner-scoped tasks
//!
//! ## Auth Ports
//!
//! - `TokenIssuer` - Sign and verify access/refresh tokens
//! - `PasswordHasher` - Hash and check passwords
//!
//! ## Background Work
//!
//! - `JobQueue` / `JobConsumer` - Fire-and-forget jobs by topic

mod clock;
mod job_queue;
mod key_value_store;
mod password_hasher;
mod rate_limiter;
mod task_repository;
mod token_issuer;
mod user_repository;

pub use clock::Clock;
pub use job_queue::{Job, JobConsumer, JobQueue, JobQueueError};
pub use key_value_store::{get_json, set_json, KeyValueStore, StoreError};
pub use password_hasher::PasswordHasher;
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};
pub use task_repository::TaskRepository;
pub use token_issuer::{IssuedToken, TokenIssuer, TokenPair};
pub use user_repository::UserRepository;
