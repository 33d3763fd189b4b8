//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT token issuing and Argon2id password hashing
//! - `cache` - Key-value stores (in-memory, Redis)
//! - `clock` - System and manual clocks
//! - `http` - axum routers, middleware, and error mapping
//! - `jobs` - Job queues (in-memory, Redis) and the status worker
//! - `memory` - In-memory repositories
//! - `postgres` - PostgreSQL repositories
//! - `rate_limiter` - Fixed-window limiters

pub mod auth;
pub mod cache;
pub mod clock;
pub mod http;
pub mod jobs;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
