//! Background job queue port.
//!
//! Producers enqueue fire-and-forget jobs by topic; a worker consumes them.
//! Delivery is at-most-once: a job popped by a worker that then crashes is
//! lost.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{JobId, Timestamp};

/// Envelope for one queued job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub topic: String,
    pub payload: serde_json::Value,
    pub enqueued_at: Timestamp,
}

impl Job {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: JobId::new(),
            topic: topic.into(),
            payload,
            enqueued_at: Timestamp::now(),
        }
    }

    /// Decodes the payload into a typed value.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, JobQueueError> {
        serde_json::from_value(self.payload.clone())
            .map_err(|e| JobQueueError::Serialization(e.to_string()))
    }
}

/// Producer side of the queue.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Add a job to the topic's queue.
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError>;
}

/// Consumer side of the queue.
#[async_trait]
pub trait JobConsumer: Send + Sync {
    /// Wait up to `timeout` for the next job on `topic`.
    ///
    /// Returns `None` when the wait elapses without a job.
    async fn next(&self, topic: &str, timeout: Duration) -> Result<Option<Job>, JobQueueError>;
}

/// Errors from the job queue.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum JobQueueError {
    #[error("queue unavailable: {0}")]
    Unavailable(String),

    #[error("job serialization failed: {0}")]
    Serialization(String),
}
