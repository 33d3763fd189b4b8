//! HTTP DTOs for authentication endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::users::UserResponse;
use crate::application::handlers::auth::AuthSession;

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signed-in user plus a fresh token pair.
///
/// Expiry fields are lifetimes in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub access_token_expires_in: u64,
    pub refresh_token: String,
    pub refresh_token_expires_in: u64,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserResponse::from(&session.user),
            access_token: session.tokens.access.token,
            access_token_expires_in: session.tokens.access.expires_in,
            refresh_token: session.tokens.refresh.token,
            refresh_token_expires_in: session.tokens.refresh.expires_in,
        }
    }
}
