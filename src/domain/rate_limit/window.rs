//! Fixed-window counter state and the admission decision.
//!
//! The decision is a pure function of the stored state, the policy, and the
//! current time. Adapters perform the single read and the optional write.

use super::{ttl_secs_ceil, RateLimitPolicy};
use serde::{Deserialize, Serialize};

/// Counter for one `(identifier, operation)` window as held in the store.
///
/// Serialized as `{"count": <int>, "expiresAt": <epoch-millis>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWindowState {
    /// Requests admitted in the current window, starting at 1.
    pub count: u32,
    /// Absolute end of the window in epoch milliseconds.
    pub expires_at: u64,
}

impl RateWindowState {
    /// Opens a new window at `now_ms`.
    pub fn open(policy: &RateLimitPolicy, now_ms: u64) -> Self {
        Self {
            count: 1,
            expires_at: now_ms.saturating_add(policy.window_ms),
        }
    }

    /// A window is over once `now` reaches its end.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    /// Milliseconds left in the window, zero when expired.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at.saturating_sub(now_ms)
    }

    /// Parses a stored value. Anything unreadable yields `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn encode(&self) -> String {
        // Two integer fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Outcome of evaluating one request against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// First request of a new window. Write `state` with `ttl_secs` and admit.
    Open { state: RateWindowState, ttl_secs: u64 },
    /// Inside a live window with quota left. Write `state` with `ttl_secs`
    /// (the remaining window budget, not a fresh one) and admit.
    Increment { state: RateWindowState, ttl_secs: u64 },
    /// Quota exhausted. Nothing is written.
    Exceeded { state: RateWindowState },
}

impl WindowDecision {
    /// Evaluates a request.
    ///
    /// `current` is `None` when the key is absent or its value was malformed.
    pub fn evaluate(
        current: Option<RateWindowState>,
        policy: &RateLimitPolicy,
        now_ms: u64,
    ) -> Self {
        match current {
            Some(state) if !state.is_expired(now_ms) => {
                if state.count >= policy.limit {
                    WindowDecision::Exceeded { state }
                } else {
                    WindowDecision::Increment {
                        state: RateWindowState {
                            count: state.count + 1,
                            expires_at: state.expires_at,
                        },
                        ttl_secs: ttl_secs_ceil(state.remaining_ms(now_ms)),
                    }
                }
            }
            _ => WindowDecision::Open {
                state: RateWindowState::open(policy, now_ms),
                ttl_secs: policy.window_ttl_secs(),
            },
        }
    }

    pub fn is_admitted(&self) -> bool {
        !matches!(self, WindowDecision::Exceeded { .. })
    }

    /// State after the decision (the stored state when exceeded).
    pub fn state(&self) -> RateWindowState {
        match self {
            WindowDecision::Open { state, .. }
            | WindowDecision::Increment { state, .. }
            | WindowDecision::Exceeded { state } => *state,
        }
    }

    /// The write to perform, if any.
    pub fn write(&self) -> Option<(RateWindowState, u64)> {
        match self {
            WindowDecision::Open { state, ttl_secs }
            | WindowDecision::Increment { state, ttl_secs } => Some((*state, *ttl_secs)),
            WindowDecision::Exceeded { .. } => None,
        }
    }
}

/// Builds the store key for an identifier and operation name.
pub fn window_key(identifier: &str, operation: &str) -> String {
    format!("{}:{}", identifier, operation)
}
