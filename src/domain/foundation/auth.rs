//! Authentication types for the domain layer.
//!
//! These types represent an authenticated principal extracted from a verified
//! JWT. They carry no token-library dependencies; the `TokenIssuer` port
//! populates them.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after token verification:
//! let user = token_issuer.verify(token, TokenClass::Access)?;
//!
//! // Inject into request extensions for handlers to use
//! request.extensions_mut().insert(user);
//! ```

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

/// The intended use of a signed token.
///
/// Access tokens authorize API calls; refresh tokens only mint new pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    Access,
    Refresh,
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Access => f.write_str("access"),
            TokenClass::Refresh => f.write_str("refresh"),
        }
    }
}

/// Authenticated principal extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's identifier (token subject).
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            role,
        }
    }

    /// Returns true if the principal holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns true if the principal may manage the given user account.
    pub fn can_manage(&self, user_id: &UserId) -> bool {
        self.is_admin() || &self.id == user_id
    }
}

/// Authentication errors that can occur during token handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// A well-formed token was presented for the wrong use.
    #[error("Expected {expected} token")]
    WrongTokenClass { expected: TokenClass },

    /// Token is valid but the user no longer exists in the system.
    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Signing or hashing failed for reasons unrelated to the caller.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::WrongTokenClass { .. }
                | AuthError::UserNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_manage_any_user() {
        let admin = AuthenticatedUser::new(UserId::new(), "root@example.com", UserRole::Admin);
        assert!(admin.can_manage(&UserId::new()));
    }

    #[test]
    fn user_can_only_manage_self() {
        let me = AuthenticatedUser::new(UserId::new(), "me@example.com", UserRole::User);
        assert!(me.can_manage(&me.id.clone()));
        assert!(!me.can_manage(&UserId::new()));
    }

    #[test]
    fn role_parses_from_stored_form() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn wrong_token_class_requires_reauthentication() {
        let err = AuthError::WrongTokenClass {
            expected: TokenClass::Refresh,
        };
        assert!(err.requires_reauthentication());
        assert_eq!(err.to_string(), "Expected refresh token");
    }

    #[test]
    fn service_unavailable_is_not_reauthentication() {
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }
}
