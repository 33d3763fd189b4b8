//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Access token verification and extractors
//! - `rate_limit` - Per-operation fixed-window admission

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, bearer_token, AuthRejection, AuthState, OptionalAuth, RequireAuth};
pub use rate_limit::{rate_limit_middleware, RateLimitState, RouteRateLimits};
