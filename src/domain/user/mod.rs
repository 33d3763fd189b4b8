//! User domain module.
//!
//! User accounts, credential validation rules, and the errors shared by the
//! user management and authentication flows.

mod aggregate;
mod errors;

pub use aggregate::{
    normalize_email, validate_password, User, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use errors::UserError;
