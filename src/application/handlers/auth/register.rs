//! RegisterHandler - Creates an account and signs the new user in.

use std::sync::Arc;

use super::{principal_of, AuthSession};
use crate::application::handlers::user::{CreateUserCommand, CreateUserHandler};
use crate::domain::user::UserError;
use crate::ports::{PasswordHasher, TokenIssuer, TokenPair, UserRepository};

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub name: String,
    pub password: String,
}

pub struct RegisterHandler {
    create_user: CreateUserHandler,
    tokens: Arc<dyn TokenIssuer>,
}

impl RegisterHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            create_user: CreateUserHandler::new(users, hasher),
            tokens,
        }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<AuthSession, UserError> {
        let user = self
            .create_user
            .handle(CreateUserCommand {
                email: cmd.email,
                name: cmd.name,
                password: cmd.password,
            })
            .await?;

        let tokens = TokenPair::issue(self.tokens.as_ref(), &principal_of(&user))?;
        Ok(AuthSession { user, tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::application::handlers::test_support::{fast_hasher, token_issuer};
    use crate::domain::foundation::{TokenClass, UserRole};

    fn cmd(email: &str) -> RegisterCommand {
        RegisterCommand {
            email: email.to_string(),
            name: "Ada".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn register_returns_verifiable_token_pair() {
        let tokens = token_issuer();
        let handler = RegisterHandler::new(
            Arc::new(InMemoryUserRepository::new()),
            fast_hasher(),
            tokens.clone(),
        );

        let session = handler.handle(cmd("ada@example.com")).await.unwrap();

        let principal = tokens
            .verify(&session.tokens.access.token, TokenClass::Access)
            .unwrap();
        assert_eq!(principal.id, *session.user.id());
        assert_eq!(principal.role, UserRole::User);
        assert!(tokens
            .verify(&session.tokens.refresh.token, TokenClass::Refresh)
            .is_ok());
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let handler = RegisterHandler::new(
            Arc::new(InMemoryUserRepository::new()),
            fast_hasher(),
            token_issuer(),
        );
        handler.handle(cmd("ada@example.com")).await.unwrap();

        let err = handler.handle(cmd("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::EmailTaken(_)));
    }
}
