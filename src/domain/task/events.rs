//! Background job payloads emitted by task commands.

use super::TaskStatus;
use crate::domain::foundation::TaskId;
use serde::{Deserialize, Serialize};

/// Queue topic for task status notifications.
pub const TASK_STATUS_TOPIC: &str = "task-status-update";

/// Payload of a `task-status-update` job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusChanged {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

impl TaskStatusChanged {
    pub fn new(task_id: TaskId, status: TaskStatus) -> Self {
        Self { task_id, status }
    }
}
