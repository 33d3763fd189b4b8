//! Rate limit domain module.
//!
//! Fixed-window counting: a policy per protected operation, the stored window
//! state, and the pure decision that admits or rejects a request.
//!
//! Known approximations of the record-based scheme:
//!
//! - A client can get up to `2 × limit` requests through across a window
//!   boundary.
//! - The read-modify-write is not compare-and-set, so concurrent requests on
//!   one key may under-count.

mod policy;
mod window;

pub use policy::{ttl_secs_ceil, RateLimitPolicy};
pub use window::{window_key, RateWindowState, WindowDecision};
