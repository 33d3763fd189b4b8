//! GetTaskHandler - Query handler for one task.

use std::sync::Arc;

use crate::domain::foundation::{TaskId, UserId};
use crate::domain::task::{Task, TaskError};
use crate::ports::TaskRepository;

#[derive(Debug, Clone)]
pub struct GetTaskQuery {
    pub owner: UserId,
    pub task_id: TaskId,
}

/// Another user's task is reported exactly like a missing one.
pub struct GetTaskHandler {
    tasks: Arc<dyn TaskRepository>,
}

impl GetTaskHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn handle(&self, query: GetTaskQuery) -> Result<Task, TaskError> {
        self.tasks
            .find_by_id(&query.owner, &query.task_id)
            .await?
            .ok_or(TaskError::NotFound(query.task_id))
    }
}
