//! Authentication application handlers.
//!
//! Registration, login, and token refresh all finish by issuing a fresh
//! access/refresh pair through the `TokenIssuer` port.

mod login;
mod refresh_tokens;
mod register;

pub use login::{LoginCommand, LoginHandler};
pub use refresh_tokens::{RefreshTokensCommand, RefreshTokensHandler};
pub use register::{RegisterCommand, RegisterHandler};

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::user::User;
use crate::ports::TokenPair;

/// A signed-in user and their new tokens.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

fn principal_of(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::new(*user.id(), user.email(), user.role())
}
