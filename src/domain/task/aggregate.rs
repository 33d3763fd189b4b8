//! Task aggregate entity and its value types.
//!
//! Every task belongs to exactly one user; all reads and writes are scoped by
//! that owner.

use crate::domain::foundation::{DomainError, TaskId, Timestamp, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for a task title.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(TaskPriority::Low),
            "MEDIUM" => Ok(TaskPriority::Medium),
            "HIGH" => Ok(TaskPriority::High),
            other => Err(ValidationError::invalid_format(
                "priority",
                format!("unknown priority '{}'", other),
            )),
        }
    }
}

/// Partial update applied by `PATCH /tasks/:id`.
///
/// `None` leaves a field untouched. For `description` and `due_date`,
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<Timestamp>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self == &TaskChanges::default()
    }
}

/// Task aggregate.
///
/// # Invariants
///
/// - `title` is 1-255 characters after trimming
/// - `user_id` never changes after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    user_id: UserId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Task {
    /// Create a new task owned by `user_id`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long
    pub fn new(
        user_id: UserId,
        title: &str,
        description: Option<String>,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: Option<Timestamp>,
    ) -> Result<Self, DomainError> {
        let title = Self::validate_title(title)?;

        let now = Timestamp::now();
        Ok(Self {
            id: TaskId::new(),
            user_id,
            title,
            description,
            status,
            priority,
            due_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a task from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TaskId,
        user_id: UserId,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        priority: TaskPriority,
        due_date: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            description,
            status,
            priority,
            due_date,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn due_date(&self) -> Option<&Timestamp> {
        self.due_date.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Checks if the given user owns this task.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a partial update.
    ///
    /// Returns the previous status when the update changed it, so the caller
    /// can emit a status-change job.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the new title is invalid; nothing is applied
    pub fn apply(&mut self, changes: TaskChanges) -> Result<Option<TaskStatus>, DomainError> {
        let title = match changes.title {
            Some(title) => Some(Self::validate_title(&title)?),
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }

        let previous = match changes.status {
            Some(status) if status != self.status => {
                Some(std::mem::replace(&mut self.status, status))
            }
            _ => None,
        };

        self.updated_at = Timestamp::now();
        Ok(previous)
    }

    /// Set the status only. Returns the previous status if it changed.
    pub fn set_status(&mut self, status: TaskStatus) -> Option<TaskStatus> {
        if status == self.status {
            return None;
        }
        self.updated_at = Timestamp::now();
        Some(std::mem::replace(&mut self.status, status))
    }

    fn validate_title(title: &str) -> Result<String, DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_task() -> Task {
        Task::new(
            UserId::new(),
            "Write report",
            None,
            TaskStatus::default(),
            TaskPriority::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn defaults_are_pending_and_medium() {
        let task = test_task();
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.priority(), TaskPriority::Medium);
    }

    #[test]
    fn new_task_rejects_blank_title() {
        let result = Task::new(
            UserId::new(),
            "   ",
            None,
            TaskStatus::Pending,
            TaskPriority::Low,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn new_task_rejects_too_long_title() {
        let long = "x".repeat(MAX_TITLE_LENGTH + 1);
        let result = Task::new(
            UserId::new(),
            &long,
            None,
            TaskStatus::Pending,
            TaskPriority::Low,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn apply_reports_previous_status_when_changed() {
        let mut task = test_task();
        let previous = task
            .apply(TaskChanges {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(previous, Some(TaskStatus::Pending));
        assert_eq!(task.status(), TaskStatus::InProgress);
    }

    #[test]
    fn apply_same_status_reports_no_change() {
        let mut task = test_task();
        let previous = task
            .apply(TaskChanges {
                status: Some(TaskStatus::Pending),
                title: Some("Renamed".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(previous, None);
        assert_eq!(task.title(), "Renamed");
    }

    #[test]
    fn apply_with_invalid_title_changes_nothing() {
        let mut task = test_task();
        let result = task.apply(TaskChanges {
            title: Some(String::new()),
            priority: Some(TaskPriority::High),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(task.priority(), TaskPriority::Medium);
    }

    #[test]
    fn apply_can_clear_description() {
        let mut task = test_task();
        task.apply(TaskChanges {
            description: Some(Some("details".to_string())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(task.description(), Some("details"));
        task.apply(TaskChanges {
            description: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(task.description(), None);
    }

    #[test]
    fn set_status_is_noop_for_same_status() {
        let mut task = test_task();
        assert_eq!(task.set_status(TaskStatus::Pending), None);
        assert_eq!(task.set_status(TaskStatus::Completed), Some(TaskStatus::Pending));
    }

    #[test]
    fn status_uses_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        assert!("URGENT".parse::<TaskPriority>().is_err());
    }
}
