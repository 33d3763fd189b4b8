//! CreateUserHandler - Command handler for creating user accounts.

use std::sync::Arc;

use crate::domain::user::{validate_password, User, UserError};
use crate::ports::{PasswordHasher, UserRepository};

/// Command to create a user account.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Handler for creating user accounts.
///
/// Used directly by `POST /users` and by registration.
pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: CreateUserCommand) -> Result<User, UserError> {
        // 1. Validate before paying for a hash
        validate_password(&cmd.password)?;
        let draft = User::new(&cmd.email, &cmd.name, String::new())?;

        // 2. Fast-path duplicate check; the unique index is the real guard
        if self.users.find_by_email(draft.email()).await?.is_some() {
            return Err(UserError::email_taken(draft.email()));
        }

        // 3. Hash and persist
        let hash = self.hasher.hash(&cmd.password)?;
        let mut user = draft;
        user.set_password_hash(hash);
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id(), "User created");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::application::handlers::test_support::fast_hasher;

    fn handler() -> (CreateUserHandler, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let handler = CreateUserHandler::new(users.clone(), fast_hasher());
        (handler, users)
    }

    fn cmd(email: &str, password: &str) -> CreateUserCommand {
        CreateUserCommand {
            email: email.to_string(),
            name: "Ada".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn creates_user_with_hashed_password() {
        let (handler, users) = handler();

        let user = handler
            .handle(cmd("Ada@Example.com", "correct horse"))
            .await
            .unwrap();

        assert_eq!(user.email(), "ada@example.com");
        assert_ne!(user.password_hash(), "correct horse");
        assert!(user.password_hash().starts_with("$argon2"));
        assert!(users.find_by_id(user.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (handler, _) = handler();
        handler
            .handle(cmd("ada@example.com", "correct horse"))
            .await
            .unwrap();

        let err = handler
            .handle(cmd("ADA@example.com", "another password"))
            .await
            .unwrap_err();
        assert_eq!(err, UserError::email_taken("ada@example.com"));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (handler, _) = handler();
        let err = handler.handle(cmd("ada@example.com", "short")).await.unwrap_err();
        assert!(matches!(err, UserError::ValidationFailed { ref field, .. } if field == "password"));
    }
}
