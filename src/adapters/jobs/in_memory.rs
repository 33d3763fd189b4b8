//! In-memory job queue for tests and single-process development.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

use crate::ports::{Job, JobConsumer, JobQueue, JobQueueError};

/// FIFO queues per topic, shared by every clone.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobQueue {
    queues: Arc<Mutex<HashMap<String, VecDeque<Job>>>>,
    notify: Arc<Notify>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Jobs currently waiting on `topic`, oldest first.
    pub async fn pending(&self, topic: &str) -> Vec<Job> {
        self.queues
            .lock()
            .await
            .get(topic)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of jobs waiting on `topic`.
    pub async fn len(&self, topic: &str) -> usize {
        self.queues.lock().await.get(topic).map_or(0, VecDeque::len)
    }

    async fn pop(&self, topic: &str) -> Option<Job> {
        self.queues
            .lock()
            .await
            .get_mut(topic)
            .and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError> {
        self.queues
            .lock()
            .await
            .entry(job.topic.clone())
            .or_default()
            .push_back(job);
        self.notify.notify_waiters();
        Ok(())
    }
}

#[async_trait]
impl JobConsumer for InMemoryJobQueue {
    async fn next(&self, topic: &str, timeout: Duration) -> Result<Option<Job>, JobQueueError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            // Register interest before checking so an enqueue in between is not missed.
            let notified = self.notify.notified();
            if let Some(job) = self.pop(topic).await {
                return Ok(Some(job));
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn jobs_are_consumed_in_order_per_topic() {
        let queue = InMemoryJobQueue::new();
        queue.enqueue(Job::new("a", json!(1))).await.unwrap();
        queue.enqueue(Job::new("b", json!(2))).await.unwrap();
        queue.enqueue(Job::new("a", json!(3))).await.unwrap();

        let first = queue.next("a", Duration::ZERO).await.unwrap().unwrap();
        let second = queue.next("a", Duration::ZERO).await.unwrap().unwrap();
        assert_eq!(first.payload, json!(1));
        assert_eq!(second.payload, json!(3));
        assert_eq!(queue.len("b").await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn next_returns_none_after_timeout() {
        let queue = InMemoryJobQueue::new();
        let job = queue.next("empty", Duration::from_secs(1)).await.unwrap();
        assert!(job.is_none());
    }

    #[tokio::test]
    async fn waiting_consumer_wakes_on_enqueue() {
        let queue = InMemoryJobQueue::new();
        let consumer = queue.clone();
        let handle =
            tokio::spawn(async move { consumer.next("t", Duration::from_secs(5)).await });

        tokio::task::yield_now().await;
        queue.enqueue(Job::new("t", json!("hello"))).await.unwrap();

        let job = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(job.payload, json!("hello"));
    }
}
