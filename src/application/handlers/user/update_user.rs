//! UpdateUserHandler - Command handler for editing an account.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, UserId};
use crate::domain::user::{validate_password, User, UserError};
use crate::ports::{PasswordHasher, UserRepository};

/// Command to change a user's profile or password.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Handler for updating users. Only the account owner or an admin may edit.
pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: UpdateUserCommand) -> Result<User, UserError> {
        if !cmd.actor.can_manage(&cmd.user_id) {
            return Err(UserError::Forbidden);
        }

        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or(UserError::NotFound(cmd.user_id))?;

        if let Some(name) = &cmd.name {
            user.rename(name)?;
        }
        if let Some(email) = &cmd.email {
            user.change_email(email)?;
        }
        if let Some(password) = &cmd.password {
            validate_password(password)?;
            user.set_password_hash(self.hasher.hash(password)?);
        }

        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id(), actor = %cmd.actor.id, "User updated");
        Ok(user)
    }
}
