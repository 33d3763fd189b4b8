//! User and account-flow error types.

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, UserId};

/// Errors raised by user management and the register/login/refresh flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    /// User was not found.
    NotFound(UserId),
    /// Another account already uses this e-mail.
    EmailTaken(String),
    /// Unknown e-mail or wrong password. Deliberately indistinguishable.
    InvalidCredentials,
    /// Token rejected or principal no longer valid.
    Unauthorized(AuthError),
    /// Caller may not act on this account.
    Forbidden,
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl UserError {
    pub fn not_found(id: UserId) -> Self {
        UserError::NotFound(id)
    }
    pub fn email_taken(email: impl Into<String>) -> Self {
        UserError::EmailTaken(email.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UserError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        UserError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            UserError::NotFound(_) => ErrorCode::UserNotFound,
            UserError::EmailTaken(_) => ErrorCode::EmailTaken,
            UserError::InvalidCredentials | UserError::Unauthorized(_) => ErrorCode::Unauthorized,
            UserError::Forbidden => ErrorCode::Forbidden,
            UserError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            UserError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            UserError::NotFound(id) => format!("User not found: {}", id),
            UserError::EmailTaken(email) => format!("Email already registered: {}", email),
            UserError::InvalidCredentials => "Invalid credentials".to_string(),
            UserError::Unauthorized(err) => err.to_string(),
            UserError::Forbidden => "Permission denied".to_string(),
            UserError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            UserError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for UserError {}

impl From<DomainError> for UserError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::EmailTaken => UserError::EmailTaken(
                err.details.get("email").cloned().unwrap_or_default(),
            ),
            ErrorCode::Forbidden => UserError::Forbidden,
            ErrorCode::Unauthorized => UserError::Unauthorized(AuthError::InvalidToken),
            ErrorCode::ValidationFailed => UserError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => UserError::Infrastructure(err.to_string()),
        }
    }
}

impl From<AuthError> for UserError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServiceUnavailable(msg) => UserError::Infrastructure(msg),
            AuthError::InsufficientPermissions => UserError::Forbidden,
            other => UserError::Unauthorized(other),
        }
    }
}
