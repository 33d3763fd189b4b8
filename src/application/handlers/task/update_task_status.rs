//! UpdateTaskStatusHandler - Status-only transition for one task.

use std::sync::Arc;

use super::notify_status_change;
use crate::domain::foundation::{TaskId, UserId};
use crate::domain::task::{Task, TaskError, TaskStatus};
use crate::ports::{JobQueue, TaskRepository};

#[derive(Debug, Clone)]
pub struct UpdateTaskStatusCommand {
    pub owner: UserId,
    pub task_id: TaskId,
    pub status: TaskStatus,
}

pub struct UpdateTaskStatusHandler {
    tasks: Arc<dyn TaskRepository>,
    queue: Arc<dyn JobQueue>,
}

impl UpdateTaskStatusHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, queue: Arc<dyn JobQueue>) -> Self {
        Self { tasks, queue }
    }

    /// Setting the current status again is a no-op and enqueues nothing.
    pub async fn handle(&self, cmd: UpdateTaskStatusCommand) -> Result<Task, TaskError> {
        let mut task = self
            .tasks
            .find_by_id(&cmd.owner, &cmd.task_id)
            .await?
            .ok_or(TaskError::NotFound(cmd.task_id))?;

        if task.set_status(cmd.status).is_some() {
            self.tasks.update(&task).await?;
            notify_status_change(self.queue.as_ref(), *task.id(), task.status()).await;
        }

        Ok(task)
    }
}
