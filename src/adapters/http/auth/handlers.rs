//! HTTP handlers for authentication endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::{BadRequest, UserApiError};
use crate::adapters::http::middleware::bearer_token;
use crate::adapters::http::state::AppState;
use crate::application::handlers::auth::{LoginCommand, RefreshTokensCommand, RegisterCommand};
use crate::domain::foundation::AuthError;
use crate::domain::user::UserError;

use super::dto::{AuthResponse, LoginRequest, RegisterRequest};

/// POST /auth/register - Create an account and sign in.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, UserApiError> {
    let Json(req) = payload.map_err(BadRequest::from)?;

    let session = state
        .register_handler()
        .handle(RegisterCommand {
            email: req.email,
            name: req.name,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}

/// POST /auth/login - Exchange credentials for a token pair.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, UserApiError> {
    let Json(req) = payload.map_err(BadRequest::from)?;

    let session = state
        .login_handler()
        .handle(LoginCommand {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(AuthResponse::from(session)))
}

/// GET /auth/refresh-token - Exchange a refresh token (as Bearer) for a new pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, UserApiError> {
    let refresh_token = bearer_token(&headers)
        .ok_or(UserError::Unauthorized(AuthError::InvalidToken))?
        .to_string();

    let session = state
        .refresh_tokens_handler()
        .handle(RefreshTokensCommand { refresh_token })
        .await?;

    Ok(Json(AuthResponse::from(session)))
}
