//! User application handlers.
//!
//! Command and query handlers for account management.

mod create_user;
mod get_user;
mod remove_user;
mod update_user;

pub use create_user::{CreateUserCommand, CreateUserHandler};
pub use get_user::{GetUserHandler, GetUserQuery, ListUsersHandler};
pub use remove_user::{RemoveUserCommand, RemoveUserHandler};
pub use update_user::{UpdateUserCommand, UpdateUserHandler};
