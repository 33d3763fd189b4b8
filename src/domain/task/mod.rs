//! Task domain module.
//!
//! Owner-scoped tasks, the read-side query types, and the status-change job
//! payload published to the background queue.

mod aggregate;
mod errors;
mod events;
mod query;

pub use aggregate::{Task, TaskChanges, TaskPriority, TaskStatus, MAX_TITLE_LENGTH};
pub use errors::TaskError;
pub use events::{TaskStatusChanged, TASK_STATUS_TOPIC};
pub use query::{
    BatchAction, Page, PageRequest, TaskFilter, TaskStats, DEFAULT_PAGE_LIMIT, MAX_BATCH_SIZE,
    MAX_PAGE_LIMIT,
};
