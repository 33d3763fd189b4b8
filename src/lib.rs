//! TaskFlow - Task management API with per-operation rate limiting
//!
//! Users register and sign in with JWT access/refresh tokens, then manage
//! their own tasks. Every protected route is admitted by a fixed-window rate
//! limiter whose counters live in a pluggable key-value store.
//!
//! The crate follows a hexagonal layout: `domain` holds the pure types and
//! rules, `ports` the traits, `adapters` the Redis/PostgreSQL/HTTP
//! implementations, and `application` the command and query handlers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
