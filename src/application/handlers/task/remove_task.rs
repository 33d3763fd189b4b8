//! RemoveTaskHandler - Deletes one of the caller's tasks.

use std::sync::Arc;

use crate::domain::foundation::{TaskId, UserId};
use crate::domain::task::TaskError;
use crate::ports::TaskRepository;

#[derive(Debug, Clone)]
pub struct RemoveTaskCommand {
    pub owner: UserId,
    pub task_id: TaskId,
}

pub struct RemoveTaskHandler {
    tasks: Arc<dyn TaskRepository>,
}

impl RemoveTaskHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn handle(&self, cmd: RemoveTaskCommand) -> Result<(), TaskError> {
        if !self.tasks.delete(&cmd.owner, &cmd.task_id).await? {
            return Err(TaskError::NotFound(cmd.task_id));
        }
        tracing::info!(task_id = %cmd.task_id, "Task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTaskRepository;
    use crate::application::handlers::task::fixtures::seed_task;
    use crate::domain::task::{TaskPriority, TaskStatus};

    #[tokio::test]
    async fn removes_owned_task_once() {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let owner = UserId::new();
        let task = seed_task(tasks.as_ref(), owner, TaskStatus::Pending, TaskPriority::Low).await;
        let handler = RemoveTaskHandler::new(tasks);
        let cmd = RemoveTaskCommand {
            owner,
            task_id: *task.id(),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err, TaskError::NotFound(*task.id()));
    }

    #[tokio::test]
    async fn stranger_cannot_remove() {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let owner = UserId::new();
        let task = seed_task(tasks.as_ref(), owner, TaskStatus::Pending, TaskPriority::Low).await;

        let err = RemoveTaskHandler::new(tasks.clone())
            .handle(RemoveTaskCommand {
                owner: UserId::new(),
                task_id: *task.id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::NotFound(_)));
        assert!(tasks.find_by_id(&owner, task.id()).await.unwrap().is_some());
    }
}
