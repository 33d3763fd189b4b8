//! CreateTaskHandler - Command handler for creating tasks.

use std::sync::Arc;

use super::notify_status_change;
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::task::{Task, TaskError, TaskPriority, TaskStatus};
use crate::ports::{JobQueue, TaskRepository};

/// Command to create a task for `owner`.
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub owner: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
}

pub struct CreateTaskHandler {
    tasks: Arc<dyn TaskRepository>,
    queue: Arc<dyn JobQueue>,
}

impl CreateTaskHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, queue: Arc<dyn JobQueue>) -> Self {
        Self { tasks, queue }
    }

    pub async fn handle(&self, cmd: CreateTaskCommand) -> Result<Task, TaskError> {
        let task = Task::new(
            cmd.owner,
            &cmd.title,
            cmd.description,
            cmd.status.unwrap_or_default(),
            cmd.priority.unwrap_or_default(),
            cmd.due_date,
        )?;

        self.tasks.create(&task).await?;
        notify_status_change(self.queue.as_ref(), *task.id(), task.status()).await;

        tracing::info!(task_id = %task.id(), owner = %task.user_id(), "Task created");
        Ok(task)
    }
}
