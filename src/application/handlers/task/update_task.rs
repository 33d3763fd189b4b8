//! UpdateTaskHandler - Command handler for partial task edits.

use std::sync::Arc;

use super::notify_status_change;
use crate::domain::foundation::{TaskId, UserId};
use crate::domain::task::{Task, TaskChanges, TaskError};
use crate::ports::{JobQueue, TaskRepository};

/// Command to apply a partial update to one of the caller's tasks.
#[derive(Debug, Clone)]
pub struct UpdateTaskCommand {
    pub owner: UserId,
    pub task_id: TaskId,
    pub changes: TaskChanges,
}

pub struct UpdateTaskHandler {
    tasks: Arc<dyn TaskRepository>,
    queue: Arc<dyn JobQueue>,
}

impl UpdateTaskHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, queue: Arc<dyn JobQueue>) -> Self {
        Self { tasks, queue }
    }

    pub async fn handle(&self, cmd: UpdateTaskCommand) -> Result<Task, TaskError> {
        let mut task = self
            .tasks
            .find_by_id(&cmd.owner, &cmd.task_id)
            .await?
            .ok_or(TaskError::NotFound(cmd.task_id))?;

        if cmd.changes.is_empty() {
            return Ok(task);
        }

        let previous = task.apply(cmd.changes)?;
        self.tasks.update(&task).await?;

        if let Some(previous) = previous {
            tracing::debug!(task_id = %task.id(), from = %previous, to = %task.status(), "Task status changed");
            notify_status_change(self.queue.as_ref(), *task.id(), task.status()).await;
        }

        Ok(task)
    }
}
