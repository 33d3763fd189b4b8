//! HTTP handlers for task endpoints.
//!
//! Every handler requires an authenticated principal and scopes its command
//! to that user.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{BadRequest, TaskApiError};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::task::{
    BatchProcessTasksCommand, CreateTaskCommand, GetTaskQuery, GetTaskStatsQuery, ListTasksQuery,
    RemoveTaskCommand, UpdateTaskCommand, UpdateTaskStatusCommand,
};
use crate::domain::foundation::{DomainError, TaskId, Timestamp};
use crate::domain::task::{PageRequest, TaskError, TaskFilter};

use super::dto::{
    BatchProcessRequest, BatchProcessResponse, CreateTaskRequest, ListTasksParams,
    TaskListResponse, TaskResponse, UpdateTaskRequest, UpdateTaskStatusRequest,
};

/// POST /tasks - Create a task.
pub async fn create_task(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Json(req) = payload.map_err(BadRequest::from)?;

    let task = state
        .create_task_handler()
        .handle(CreateTaskCommand {
            owner: user.id,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date.map(Timestamp::from_datetime),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// GET /tasks - List the caller's tasks with optional filters.
pub async fn list_tasks(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    params: Result<Query<ListTasksParams>, QueryRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Query(params) = params.map_err(BadRequest::from)?;
    let page = PageRequest::new(params.page, params.limit)
        .map_err(|e| TaskError::from(DomainError::from(e)))?;

    let tasks = state
        .list_tasks_handler()
        .handle(ListTasksQuery {
            owner: user.id,
            filter: TaskFilter {
                status: params.status,
                priority: params.priority,
            },
            page,
        })
        .await?;

    Ok(Json(TaskListResponse::new(tasks, page.page(), page.limit())))
}

/// GET /tasks/stats - Counts by status and priority.
pub async fn task_stats(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, TaskApiError> {
    let stats = state
        .task_stats_handler()
        .handle(GetTaskStatsQuery { owner: user.id })
        .await?;
    Ok(Json(stats))
}

/// GET /tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Path(task_id) = task_id.map_err(BadRequest::from)?;

    let task = state
        .get_task_handler()
        .handle(GetTaskQuery {
            owner: user.id,
            task_id,
        })
        .await?;

    Ok(Json(TaskResponse::from(&task)))
}

/// PATCH /tasks/:id
pub async fn update_task(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    task_id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Path(task_id) = task_id.map_err(BadRequest::from)?;
    let Json(req) = payload.map_err(BadRequest::from)?;

    let task = state
        .update_task_handler()
        .handle(UpdateTaskCommand {
            owner: user.id,
            task_id,
            changes: req.into_changes(),
        })
        .await?;

    Ok(Json(TaskResponse::from(&task)))
}

/// PATCH /tasks/:id/status
pub async fn update_task_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    task_id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Path(task_id) = task_id.map_err(BadRequest::from)?;
    let Json(req) = payload.map_err(BadRequest::from)?;

    let task = state
        .update_task_status_handler()
        .handle(UpdateTaskStatusCommand {
            owner: user.id,
            task_id,
            status: req.status,
        })
        .await?;

    Ok(Json(TaskResponse::from(&task)))
}

/// DELETE /tasks/:id
pub async fn remove_task(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Path(task_id) = task_id.map_err(BadRequest::from)?;

    state
        .remove_task_handler()
        .handle(RemoveTaskCommand {
            owner: user.id,
            task_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /tasks/batch - Complete or delete several tasks at once.
pub async fn batch_process_tasks(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<BatchProcessRequest>, JsonRejection>,
) -> Result<impl IntoResponse, TaskApiError> {
    let Json(req) = payload.map_err(BadRequest::from)?;

    let result = state
        .batch_process_tasks_handler()
        .handle(BatchProcessTasksCommand {
            owner: user.id,
            task_ids: req.tasks,
            action: req.action,
        })
        .await?;

    Ok(Json(BatchProcessResponse {
        message: result.message,
        processed: result.processed,
    }))
}
