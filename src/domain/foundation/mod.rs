//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, authentication types, and error types
//! that form the vocabulary of the TaskFlow domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, TokenClass, UserRole};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{JobId, TaskId, UserId};
pub use timestamp::Timestamp;
