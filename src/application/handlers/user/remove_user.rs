//! RemoveUserHandler - Command handler for deleting an account.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, UserId};
use crate::domain::user::UserError;
use crate::ports::{TaskRepository, UserRepository};

/// Command to delete a user and everything they own.
#[derive(Debug, Clone)]
pub struct RemoveUserCommand {
    pub actor: AuthenticatedUser,
    pub user_id: UserId,
}

/// Handler for deleting users. Only the account owner or an admin may delete.
pub struct RemoveUserHandler {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl RemoveUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { users, tasks }
    }

    pub async fn handle(&self, cmd: RemoveUserCommand) -> Result<(), UserError> {
        if !cmd.actor.can_manage(&cmd.user_id) {
            return Err(UserError::Forbidden);
        }

        if self.users.find_by_id(&cmd.user_id).await?.is_none() {
            return Err(UserError::NotFound(cmd.user_id));
        }

        // Tasks first: stores without a cascading foreign key would orphan them.
        let removed_tasks = self.tasks.delete_by_owner(&cmd.user_id).await?;
        if !self.users.delete(&cmd.user_id).await? {
            return Err(UserError::NotFound(cmd.user_id));
        }

        tracing::info!(
            user_id = %cmd.user_id,
            actor = %cmd.actor.id,
            removed_tasks,
            "User deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryTaskRepository, InMemoryUserRepository};
    use crate::application::handlers::test_support::{principal, seed_user};
    use crate::domain::task::{Task, TaskPriority, TaskStatus};

    #[tokio::test]
    async fn deleting_user_removes_their_tasks() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let ada = seed_user(users.as_ref(), "ada@example.com").await;
        let task = Task::new(*ada.id(), "t", None, TaskStatus::Pending, TaskPriority::Low, None)
            .unwrap();
        tasks.create(&task).await.unwrap();

        RemoveUserHandler::new(users.clone(), tasks.clone())
            .handle(RemoveUserCommand {
                actor: principal(&ada),
                user_id: *ada.id(),
            })
            .await
            .unwrap();

        assert!(users.find_by_id(ada.id()).await.unwrap().is_none());
        assert_eq!(tasks.aggregate_stats(ada.id()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn other_user_cannot_delete() {
        let users = Arc::new(InMemoryUserRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let ada = seed_user(users.as_ref(), "ada@example.com").await;
        let bob = seed_user(users.as_ref(), "bob@example.com").await;

        let err = RemoveUserHandler::new(users.clone(), tasks)
            .handle(RemoveUserCommand {
                actor: principal(&bob),
                user_id: *ada.id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, UserError::Forbidden);
        assert!(users.find_by_id(ada.id()).await.unwrap().is_some());
    }
}
