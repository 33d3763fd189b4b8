//! Key-value store adapters.
//!
//! - `InMemoryKeyValueStore` - Clock-driven TTL map for tests
//! - `RedisKeyValueStore` - Redis `SET EX` / `GET` / `DEL` / `EXISTS`

mod in_memory;
mod redis;

pub(crate) use self::redis::map_redis_error;
pub use in_memory::InMemoryKeyValueStore;
pub use self::redis::RedisKeyValueStore;
