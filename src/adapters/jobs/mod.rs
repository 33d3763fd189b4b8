//! Job queue adapters and the background worker that consumes them.

mod in_memory;
mod redis;
mod worker;

pub use in_memory::InMemoryJobQueue;
pub use self::redis::{RedisJobConsumer, RedisJobQueue};
pub use worker::{TaskStatusWorker, TaskStatusWorkerConfig};
