//! HTTP adapter for task endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BatchProcessRequest, BatchProcessResponse, CreateTaskRequest, ListTasksParams,
    TaskListResponse, TaskResponse, UpdateTaskRequest, UpdateTaskStatusRequest,
};
pub use routes::task_routes;
