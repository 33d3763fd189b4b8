//! HTTP handlers for user endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{BadRequest, UserApiError};
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::user::{
    CreateUserCommand, GetUserQuery, RemoveUserCommand, UpdateUserCommand,
};
use crate::domain::foundation::UserId;

use super::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// POST /users - Create an account (public).
///
/// A signed-in caller is recorded as the creator in the log.
pub async fn create_user(
    State(state): State<AppState>,
    OptionalAuth(actor): OptionalAuth,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, UserApiError> {
    let Json(req) = payload.map_err(BadRequest::from)?;

    let user = state
        .create_user_handler()
        .handle(CreateUserCommand {
            email: req.email,
            name: req.name,
            password: req.password,
        })
        .await?;

    tracing::info!(
        user_id = %user.id(),
        created_by = actor.as_ref().map(|a| a.id.to_string()).as_deref().unwrap_or("self"),
        "User created"
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users - List all accounts.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<impl IntoResponse, UserApiError> {
    let users = state.list_users_handler().handle().await?;
    let body: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(body))
}

/// GET /users/:id - Fetch one account.
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<impl IntoResponse, UserApiError> {
    let Path(user_id) = user_id.map_err(BadRequest::from)?;

    let user = state
        .get_user_handler()
        .handle(GetUserQuery { user_id })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/:id - Edit an account (self or admin).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    user_id: Result<Path<UserId>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, UserApiError> {
    let Path(user_id) = user_id.map_err(BadRequest::from)?;
    let Json(req) = payload.map_err(BadRequest::from)?;

    let user = state
        .update_user_handler()
        .handle(UpdateUserCommand {
            actor,
            user_id,
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id - Delete an account and its tasks (self or admin).
pub async fn remove_user(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<impl IntoResponse, UserApiError> {
    let Path(user_id) = user_id.map_err(BadRequest::from)?;

    state
        .remove_user_handler()
        .handle(RemoveUserCommand { actor, user_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
