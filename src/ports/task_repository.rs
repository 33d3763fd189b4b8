//! Task repository port.
//!
//! Every operation is scoped by owner. A task belonging to another user is
//! indistinguishable from a missing one.

use crate::domain::foundation::{DomainError, TaskId, UserId};
use crate::domain::task::{Page, PageRequest, Task, TaskFilter, TaskStats, TaskStatus};
use async_trait::async_trait;

/// Repository port for task persistence.
///
/// Filtering, pagination, and statistics run in the store, not in memory.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Save a new task.
    async fn create(&self, task: &Task) -> Result<(), DomainError>;

    /// Find a task by id for its owner.
    async fn find_by_id(&self, owner: &UserId, id: &TaskId) -> Result<Option<Task>, DomainError>;

    /// One page of the owner's tasks, newest first, plus the filtered total.
    async fn find_by_owner_with_filters(
        &self,
        owner: &UserId,
        filter: TaskFilter,
        page: PageRequest,
    ) -> Result<Page<Task>, DomainError>;

    /// Persist changes to an existing task.
    ///
    /// # Errors
    ///
    /// - `TaskNotFound` if the owner has no such task
    async fn update(&self, task: &Task) -> Result<(), DomainError>;

    /// Delete one task. Returns false if the owner has no such task.
    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<bool, DomainError>;

    /// Of `ids`, those that exist and belong to `owner`.
    async fn find_owned_ids(
        &self,
        owner: &UserId,
        ids: &[TaskId],
    ) -> Result<Vec<TaskId>, DomainError>;

    /// Set the status of several tasks in one statement.
    ///
    /// Returns the ids whose status actually changed.
    async fn bulk_update_status(
        &self,
        owner: &UserId,
        ids: &[TaskId],
        status: TaskStatus,
    ) -> Result<Vec<TaskId>, DomainError>;

    /// Delete several tasks in one statement. Returns the number removed.
    async fn bulk_delete(&self, owner: &UserId, ids: &[TaskId]) -> Result<u64, DomainError>;

    /// Counts by status and priority for one owner.
    async fn aggregate_stats(&self, owner: &UserId) -> Result<TaskStats, DomainError>;

    /// Delete every task of an owner. Returns the number removed.
    async fn delete_by_owner(&self, owner: &UserId) -> Result<u64, DomainError>;
}
