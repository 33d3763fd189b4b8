//! ListTasksHandler - Filtered, paginated listing of the caller's tasks.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::task::{Page, PageRequest, Task, TaskError, TaskFilter};
use crate::ports::TaskRepository;

#[derive(Debug, Clone)]
pub struct ListTasksQuery {
    pub owner: UserId,
    pub filter: TaskFilter,
    pub page: PageRequest,
}

pub struct ListTasksHandler {
    tasks: Arc<dyn TaskRepository>,
}

impl ListTasksHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn handle(&self, query: ListTasksQuery) -> Result<Page<Task>, TaskError> {
        Ok(self
            .tasks
            .find_by_owner_with_filters(&query.owner, query.filter, query.page)
            .await?)
    }
}
