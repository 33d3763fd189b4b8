//! Task-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, TaskId, ValidationError};

/// Task-specific errors.
///
/// A task owned by another user is reported as `NotFound`, never `Forbidden`,
/// so task ids do not leak across accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task was not found for this owner.
    NotFound(TaskId),
    /// One or more ids in a batch are unknown to this owner.
    BatchNotFound(Vec<TaskId>),
    ValidationFailed { field: String, message: String },
    Infrastructure(String),
}

impl TaskError {
    pub fn not_found(id: TaskId) -> Self {
        TaskError::NotFound(id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TaskError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        TaskError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            TaskError::NotFound(_) | TaskError::BatchNotFound(_) => ErrorCode::TaskNotFound,
            TaskError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TaskError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            TaskError::NotFound(id) => format!("Task not found: {}", id),
            TaskError::BatchNotFound(ids) => format!(
                "Tasks not found: {}",
                ids.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            TaskError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            TaskError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TaskError {}

impl From<DomainError> for TaskError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => TaskError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => TaskError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for TaskError {
    fn from(err: ValidationError) -> Self {
        TaskError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
