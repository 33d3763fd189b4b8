//! Redis list-backed job queue.
//!
//! Producers `LPUSH` JSON envelopes onto `<prefix>queue:<topic>`; consumers
//! `BRPOP` from the other end. The consumer holds its own connection so a
//! blocking pop never stalls request traffic on the shared connection.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use std::time::Duration;

use crate::ports::{Job, JobConsumer, JobQueue, JobQueueError};

fn queue_key(prefix: &str, topic: &str) -> String {
    format!("{}queue:{}", prefix, topic)
}

fn map_redis_error(e: redis::RedisError) -> JobQueueError {
    JobQueueError::Unavailable(e.to_string())
}

/// Producer side, sharing the application's multiplexed connection.
#[derive(Clone)]
pub struct RedisJobQueue {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisJobQueue {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: String::new(),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError> {
        let body =
            serde_json::to_string(&job).map_err(|e| JobQueueError::Serialization(e.to_string()))?;
        let mut conn = self.conn.clone();
        redis::cmd("LPUSH")
            .arg(queue_key(&self.key_prefix, &job.topic))
            .arg(body)
            .query_async::<_, i64>(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}

/// Consumer side on a dedicated connection.
#[derive(Clone)]
pub struct RedisJobConsumer {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisJobConsumer {
    /// Opens a connection reserved for blocking pops.
    pub async fn connect(client: &redis::Client) -> Result<Self, JobQueueError> {
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(map_redis_error)?;
        Ok(Self {
            conn,
            key_prefix: String::new(),
        })
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

#[async_trait]
impl JobConsumer for RedisJobConsumer {
    async fn next(&self, topic: &str, timeout: Duration) -> Result<Option<Job>, JobQueueError> {
        let mut conn = self.conn.clone();
        // BRPOP treats 0 as "block forever"; never pass it.
        let wait_secs = timeout.as_secs_f64().max(0.01);
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(queue_key(&self.key_prefix, topic))
            .arg(wait_secs)
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        popped
            .map(|(_, body)| {
                serde_json::from_str(&body).map_err(|e| JobQueueError::Serialization(e.to_string()))
            })
            .transpose()
    }
}
