//! GetTaskStatsHandler - Aggregate counts over the caller's tasks.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::task::{TaskError, TaskStats};
use crate::ports::TaskRepository;

#[derive(Debug, Clone)]
pub struct GetTaskStatsQuery {
    pub owner: UserId,
}

pub struct GetTaskStatsHandler {
    tasks: Arc<dyn TaskRepository>,
}

impl GetTaskStatsHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn handle(&self, query: GetTaskStatsQuery) -> Result<TaskStats, TaskError> {
        Ok(self.tasks.aggregate_stats(&query.owner).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTaskRepository;
    use crate::application::handlers::task::fixtures::seed_task;
    use crate::domain::task::{TaskPriority, TaskStatus};

    #[tokio::test]
    async fn empty_owner_has_zero_stats() {
        let stats = GetTaskStatsHandler::new(Arc::new(InMemoryTaskRepository::new()))
            .handle(GetTaskStatsQuery {
                owner: UserId::new(),
            })
            .await
            .unwrap();
        assert_eq!(stats, TaskStats::default());
    }

    #[tokio::test]
    async fn counts_reflect_owner_tasks() {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let owner = UserId::new();
        seed_task(tasks.as_ref(), owner, TaskStatus::InProgress, TaskPriority::High).await;
        seed_task(tasks.as_ref(), owner, TaskStatus::Completed, TaskPriority::Low).await;

        let stats = GetTaskStatsHandler::new(tasks)
            .handle(GetTaskStatsQuery { owner })
            .await
            .unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.high_priority, 1);
    }
}
