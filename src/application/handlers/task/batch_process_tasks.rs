//! BatchProcessTasksHandler - Complete or delete many tasks in one statement.

use std::collections::HashSet;
use std::sync::Arc;

use super::notify_status_change;
use crate::domain::foundation::{TaskId, UserId};
use crate::domain::task::{BatchAction, TaskError, TaskStatus, MAX_BATCH_SIZE};
use crate::ports::{JobQueue, TaskRepository};

#[derive(Debug, Clone)]
pub struct BatchProcessTasksCommand {
    pub owner: UserId,
    pub task_ids: Vec<TaskId>,
    pub action: BatchAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProcessTasksResult {
    pub message: String,
    /// Distinct tasks the action was applied to.
    pub processed: u64,
}

/// Handler for batch actions.
///
/// All ids must belong to the caller; if any does not, nothing is changed and
/// the missing ids are reported.
pub struct BatchProcessTasksHandler {
    tasks: Arc<dyn TaskRepository>,
    queue: Arc<dyn JobQueue>,
}

impl BatchProcessTasksHandler {
    pub fn new(tasks: Arc<dyn TaskRepository>, queue: Arc<dyn JobQueue>) -> Self {
        Self { tasks, queue }
    }

    pub async fn handle(
        &self,
        cmd: BatchProcessTasksCommand,
    ) -> Result<BatchProcessTasksResult, TaskError> {
        let ids = dedup(cmd.task_ids);
        if ids.is_empty() {
            return Err(TaskError::validation("tasks", "At least one task id is required"));
        }
        if ids.len() > MAX_BATCH_SIZE {
            return Err(TaskError::validation(
                "tasks",
                format!("At most {} task ids per batch", MAX_BATCH_SIZE),
            ));
        }

        let owned: HashSet<TaskId> = self
            .tasks
            .find_owned_ids(&cmd.owner, &ids)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<TaskId> = ids.iter().filter(|id| !owned.contains(id)).copied().collect();
        if !missing.is_empty() {
            return Err(TaskError::BatchNotFound(missing));
        }

        let processed = match cmd.action {
            BatchAction::Complete => {
                let changed = self
                    .tasks
                    .bulk_update_status(&cmd.owner, &ids, TaskStatus::Completed)
                    .await?;
                for id in &changed {
                    notify_status_change(self.queue.as_ref(), *id, TaskStatus::Completed).await;
                }
                ids.len() as u64
            }
            BatchAction::Delete => self.tasks.bulk_delete(&cmd.owner, &ids).await?,
        };

        tracing::info!(
            owner = %cmd.owner,
            action = cmd.action.as_str(),
            processed,
            "Batch processed"
        );

        Ok(BatchProcessTasksResult {
            message: format!("Batch {} completed successfully.", cmd.action.as_str()),
            processed,
        })
    }
}

/// Drops repeated ids, keeping first-seen order.
fn dedup(ids: Vec<TaskId>) -> Vec<TaskId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
