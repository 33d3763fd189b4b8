//! TaskStatusWorker - Background consumer for task status notifications.
//!
//! Blocks on the `task-status-update` topic and records each status change.
//! Checks for shutdown between polls, so a job already popped is always
//! handled. Shutdown latency is bounded by `poll_timeout`.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_timeout` | 5s | Longest single blocking wait on the queue |
//! | `error_backoff` | 1s | Pause after a queue error before retrying |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::domain::task::{TaskStatusChanged, TASK_STATUS_TOPIC};
use crate::ports::{JobConsumer, JobQueueError};

/// Configuration for the TaskStatusWorker.
#[derive(Debug, Clone)]
pub struct TaskStatusWorkerConfig {
    pub poll_timeout: Duration,
    pub error_backoff: Duration,
}

impl Default for TaskStatusWorkerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(5),
            error_backoff: Duration::from_secs(1),
        }
    }
}

impl TaskStatusWorkerConfig {
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }
}

/// Background service that drains task status jobs.
pub struct TaskStatusWorker {
    consumer: Arc<dyn JobConsumer>,
    config: TaskStatusWorkerConfig,
}

impl TaskStatusWorker {
    pub fn new(consumer: Arc<dyn JobConsumer>) -> Self {
        Self {
            consumer,
            config: TaskStatusWorkerConfig::default(),
        }
    }

    pub fn with_config(consumer: Arc<dyn JobConsumer>, config: TaskStatusWorkerConfig) -> Self {
        Self { consumer, config }
    }

    /// Run the worker loop until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(topic = TASK_STATUS_TOPIC, "Task status worker started");

        loop {
            let stopping = *shutdown.borrow();
            // A dropped sender counts as shutdown.
            if stopping || shutdown.has_changed().is_err() {
                break;
            }

            if let Err(e) = self.poll_once().await {
                tracing::warn!(error = %e, "Task status queue error, backing off");
                tokio::select! {
                    _ = tokio::time::sleep(self.config.error_backoff) => {}
                    _ = shutdown.changed() => {}
                }
            }
        }

        tracing::info!("Task status worker stopped");
    }

    /// Wait for and handle at most one job.
    ///
    /// Returns the notification handled, or `None` if the wait elapsed. Jobs
    /// with an unreadable payload are logged and dropped.
    pub async fn poll_once(&self) -> Result<Option<TaskStatusChanged>, JobQueueError> {
        let Some(job) = self
            .consumer
            .next(TASK_STATUS_TOPIC, self.config.poll_timeout)
            .await?
        else {
            return Ok(None);
        };

        match job.payload_as::<TaskStatusChanged>() {
            Ok(change) => {
                tracing::info!(
                    job_id = %job.id,
                    task_id = %change.task_id,
                    status = %change.status,
                    "Task status changed"
                );
                Ok(Some(change))
            }
            Err(e) => {
                tracing::warn!(job_id = %job.id, error = %e, "Dropping malformed task status job");
                Ok(None)
            }
        }
    }
}
