//! Clock port.
//!
//! Window arithmetic reads time through this trait so tests can drive it.

use crate::domain::foundation::Timestamp;

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;

    fn now(&self) -> Timestamp {
        Timestamp::from_unix_millis(self.now_millis())
    }
}
