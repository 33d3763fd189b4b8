//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth types, errors)
//! - `rate_limit` - Fixed-window policies and the admission decision
//! - `task` - Owner-scoped tasks, query types, and status-change payloads
//! - `user` - User accounts and credential rules

pub mod foundation;
pub mod rate_limit;
pub mod task;
pub mod user;
