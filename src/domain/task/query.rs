//! Read-side value types: filters, pagination, statistics, batch actions.

use super::{TaskPriority, TaskStatus};
use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Largest number of task ids accepted by one batch request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Optional filters for listing a user's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Returns true if a task with these attributes passes the filter.
    pub fn matches(&self, status: TaskStatus, priority: TaskPriority) -> bool {
        self.status.map_or(true, |s| s == status) && self.priority.map_or(true, |p| p == priority)
    }
}

/// Validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Builds a page request, applying defaults for absent values.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if page is 0 or limit is outside 1..=100
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, ValidationError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page == 0 {
            return Err(ValidationError::out_of_range(
                "page",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                i64::from(MAX_PAGE_LIMIT),
                i64::from(limit),
            ));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Per-user task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub pending: u64,
    pub high_priority: u64,
}

/// Action applied by a batch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchAction {
    Complete,
    Delete,
}

impl BatchAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchAction::Complete => "complete",
            BatchAction::Delete => "delete",
        }
    }
}

impl FromStr for BatchAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete" => Ok(BatchAction::Complete),
            "delete" => Ok(BatchAction::Delete),
            other => Err(ValidationError::invalid_format(
                "action",
                format!("unknown batch action '{}'", other),
            )),
        }
    }
}
