//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod auth;
pub mod task;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;
