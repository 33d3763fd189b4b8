//! Task application handlers.
//!
//! Every command and query is scoped to the calling user. Status changes are
//! announced on the `task-status-update` queue without blocking the command.

mod batch_process_tasks;
mod create_task;
mod get_task;
mod get_task_stats;
mod list_tasks;
mod remove_task;
mod update_task;
mod update_task_status;

pub use batch_process_tasks::{
    BatchProcessTasksCommand, BatchProcessTasksHandler, BatchProcessTasksResult,
};
pub use create_task::{CreateTaskCommand, CreateTaskHandler};
pub use get_task::{GetTaskHandler, GetTaskQuery};
pub use get_task_stats::{GetTaskStatsHandler, GetTaskStatsQuery};
pub use list_tasks::{ListTasksHandler, ListTasksQuery};
pub use remove_task::{RemoveTaskCommand, RemoveTaskHandler};
pub use update_task::{UpdateTaskCommand, UpdateTaskHandler};
pub use update_task_status::{UpdateTaskStatusCommand, UpdateTaskStatusHandler};

use crate::domain::foundation::TaskId;
use crate::domain::task::{TaskStatus, TaskStatusChanged, TASK_STATUS_TOPIC};
use crate::ports::{Job, JobQueue};

/// Enqueue a status notification. Failures are logged, never returned.
async fn notify_status_change(queue: &dyn JobQueue, task_id: TaskId, status: TaskStatus) {
    let payload = match serde_json::to_value(TaskStatusChanged::new(task_id, status)) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(task_id = %task_id, error = %e, "Could not encode status job");
            return;
        }
    };

    if let Err(e) = queue.enqueue(Job::new(TASK_STATUS_TOPIC, payload)).await {
        tracing::warn!(task_id = %task_id, error = %e, "Failed to enqueue status job");
    }
}
