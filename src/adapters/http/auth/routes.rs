//! HTTP routes for authentication endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::RouteRateLimits;
use crate::adapters::http::state::AppState;
use crate::adapters::rate_limiter::operations;

use super::handlers::{login, refresh_token, register};

/// Creates the auth router.
///
/// No access-token middleware here: these routes are keyed by client address.
/// The refresh route verifies its own refresh token.
pub fn auth_routes(state: AppState, limits: &RouteRateLimits) -> Router {
    Router::new()
        .route(
            "/auth/register",
            limits.protect(operations::REGISTER, post(register)),
        )
        .route("/auth/login", limits.protect(operations::LOGIN, post(login)))
        .route(
            "/auth/refresh-token",
            limits.protect(operations::REFRESH_TOKENS, get(refresh_token)),
        )
        .with_state(state)
}
