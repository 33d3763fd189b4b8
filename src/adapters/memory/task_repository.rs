//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, TaskId, UserId};
use crate::domain::task::{
    Page, PageRequest, Task, TaskFilter, TaskPriority, TaskStats, TaskStatus,
};
use crate::ports::TaskRepository;

/// HashMap-backed task store. Ordering matches the Postgres adapter:
/// newest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> Result<(), DomainError> {
        self.tasks.write().await.insert(*task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, owner: &UserId, id: &TaskId) -> Result<Option<Task>, DomainError> {
        Ok(self
            .tasks
            .read()
            .await
            .get(id)
            .filter(|t| t.is_owner(owner))
            .cloned())
    }

    async fn find_by_owner_with_filters(
        &self,
        owner: &UserId,
        filter: TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, DomainError> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<&Task> = tasks
            .values()
            .filter(|t| t.is_owner(owner) && filter.matches(t.status(), t.priority()))
            .collect();
        matching.sort_by(|a, b| b.created_at().cmp(a.created_at()));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page { items, total })
    }

    async fn update(&self, task: &Task) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get(task.id()) {
            Some(existing) if existing.is_owner(task.user_id()) => {
                tasks.insert(*task.id(), task.clone());
                Ok(())
            }
            _ => Err(DomainError::new(ErrorCode::TaskNotFound, "Task not found")),
        }
    }

    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<bool, DomainError> {
        let mut tasks = self.tasks.write().await;
        if tasks.get(id).map_or(false, |t| t.is_owner(owner)) {
            tasks.remove(id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn find_owned_ids(
        &self,
        owner: &UserId,
        ids: &[TaskId],
    ) -> Result<Vec<TaskId>, DomainError> {
        let tasks = self.tasks.read().await;
        Ok(ids
            .iter()
            .filter(|id| tasks.get(*id).map_or(false, |t| t.is_owner(owner)))
            .copied()
            .collect())
    }

    async fn bulk_update_status(
        &self,
        owner: &UserId,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<Vec<TaskId>, DomainError> {
        let mut tasks = self.tasks.write().await;
        let mut changed = Vec::new();
        for id in ids {
            if let Some(task) = tasks.get_mut(id).filter(|t| t.is_owner(owner)) {
                if task.set_status(status).is_some() {
                    changed.push(*id);
                }
            }
        }
        Ok(changed)
    }

    async fn bulk_delete(&self, owner: &UserId, ids: &[TaskId]) -> Result<u64, DomainError> {
        let mut tasks = self.tasks.write().await;
        let mut removed = 0;
        for id in ids {
            if tasks.get(id).map_or(false, |t| t.is_owner(owner)) {
                tasks.remove(id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn aggregate_stats(&self, owner: &UserId) -> Result<TaskStats, DomainError> {
        let tasks = self.tasks.read().await;
        let mut stats = TaskStats::default();
        for task in tasks.values().filter(|t| t.is_owner(owner)) {
            stats.total += 1;
            match task.status() {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Pending => stats.pending += 1,
            }
            if task.priority() == TaskPriority::High {
                stats.high_priority += 1;
            }
        }
        Ok(stats)
    }

    async fn delete_by_owner(&self, owner: &UserId) -> Result<u64, DomainError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, t| !t.is_owner(owner));
        Ok((before - tasks.len()) as u64)
    }
}
