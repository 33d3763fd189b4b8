//! LoginHandler - Exchanges e-mail and password for a token pair.

use std::sync::Arc;

use super::{principal_of, AuthSession};
use crate::domain::user::{normalize_email, UserError};
use crate::ports::{PasswordHasher, TokenIssuer, TokenPair, UserRepository};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Handler for password login.
///
/// Unknown e-mail and wrong password both yield `InvalidCredentials` so the
/// response does not reveal which accounts exist.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<AuthSession, UserError> {
        let email = normalize_email(&cmd.email)?;

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!("Login for unknown e-mail");
            return Err(UserError::InvalidCredentials);
        };

        if !self.hasher.verify(&cmd.password, user.password_hash())? {
            tracing::debug!(user_id = %user.id(), "Login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let tokens = TokenPair::issue(self.tokens.as_ref(), &principal_of(&user))?;
        tracing::info!(user_id = %user.id(), "User logged in");
        Ok(AuthSession { user, tokens })
    }
}
