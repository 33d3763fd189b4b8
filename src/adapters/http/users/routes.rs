//! HTTP routes for user endpoints.

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, RouteRateLimits};
use crate::adapters::http::state::AppState;
use crate::adapters::rate_limiter::operations;

use super::handlers::{create_user, get_user, list_users, remove_user, update_user};

/// Creates the user router.
///
/// Access tokens are verified for every route; `POST /users` stays public
/// because it does not require a principal.
pub fn user_routes(state: AppState, limits: &RouteRateLimits) -> Router {
    Router::new()
        .route("/users", limits.protect(operations::CREATE_USER, post(create_user)))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id", patch(update_user))
        .route("/users/:id", delete(remove_user))
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
