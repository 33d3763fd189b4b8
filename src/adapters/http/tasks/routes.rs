//! HTTP routes for task endpoints.

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, RouteRateLimits};
use crate::adapters::http::state::AppState;
use crate::adapters::rate_limiter::operations;

use super::handlers::{
    batch_process_tasks, create_task, get_task, list_tasks, remove_task, task_stats,
    update_task, update_task_status,
};

/// Creates the task router.
///
/// The auth layer runs before each route's rate limit, so authenticated
/// callers are counted by user id.
pub fn task_routes(state: AppState, limits: &RouteRateLimits) -> Router {
    use operations::*;

    Router::new()
        .route("/tasks", limits.protect(CREATE_TASK, post(create_task)))
        .route("/tasks", limits.protect(LIST_TASKS, get(list_tasks)))
        .route("/tasks/stats", limits.protect(TASK_STATS, get(task_stats)))
        .route(
            "/tasks/batch",
            limits.protect(BATCH_PROCESS_TASKS, post(batch_process_tasks)),
        )
        .route("/tasks/:id", limits.protect(GET_TASK, get(get_task)))
        .route("/tasks/:id", limits.protect(UPDATE_TASK, patch(update_task)))
        .route("/tasks/:id", limits.protect(REMOVE_TASK, delete(remove_task)))
        .route(
            "/tasks/:id/status",
            limits.protect(UPDATE_TASK_STATUS, patch(update_task_status)),
        )
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
