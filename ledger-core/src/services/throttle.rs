//! Attempt throttle service - failed-attempt counting and timed lockout

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::domain::result::Result;
use crate::domain::AttemptState;
use crate::ports::AccountStore;

/// Limits for one protected path
#[derive(Debug, Clone, Copy)]
pub struct ThrottlePolicy {
    /// Failures tolerated before the key locks
    pub limit: u32,
    /// Auto-expiry for an armed lockout; `None` locks until an explicit reset
    pub lockout: Option<Duration>,
}

impl ThrottlePolicy {
    /// Login path: five failures, 30-minute lockout
    pub fn login() -> Self {
        Self {
            limit: 5,
            lockout: Some(Duration::minutes(30)),
        }
    }

    /// Banking-operation path: three failures, locked until reset
    pub fn banking() -> Self {
        Self {
            limit: 3,
            lockout: None,
        }
    }
}

/// Tracks failed attempts per identity key and answers lockout queries.
///
/// State lives in the store; a missing record reads as zero failures.
pub struct AttemptThrottle {
    store: Arc<dyn AccountStore>,
    policy: ThrottlePolicy,
}

impl AttemptThrottle {
    pub fn new(store: Arc<dyn AccountStore>, policy: ThrottlePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> ThrottlePolicy {
        self.policy
    }

    /// Report whether `key` is currently locked.
    ///
    /// An expired lockout is cleared durably, zeroing the counter, before
    /// the answer is computed. A failure of that clearing write is logged
    /// and does not change the answer.
    pub async fn check_and_maybe_reset(&self, key: &str) -> Result<bool> {
        let Some(state) = self.store.attempt_state(key).await? else {
            return Ok(false);
        };
        if state.lockout_expired(Utc::now()) {
            if let Err(err) = self.store.clear_attempt_state(key).await {
                warn!(key, %err, "failed to clear expired lockout");
            }
            return Ok(false);
        }
        Ok(state.failed_count >= self.policy.limit)
    }

    /// Record one failed attempt and return the updated count. Arms the
    /// lockout timer when the count reaches the limit.
    pub async fn record_failure(&self, key: &str) -> Result<u32> {
        let mut state = self
            .store
            .attempt_state(key)
            .await?
            .unwrap_or_else(|| AttemptState::new(key));
        state.register_failure(self.policy.limit, self.policy.lockout, Utc::now());
        self.store.put_attempt_state(&state).await?;
        debug!(key, failed_count = state.failed_count, "recorded failed attempt");
        Ok(state.failed_count)
    }

    /// Reset the counter to zero and clear any lockout for `key`
    pub async fn record_success(&self, key: &str) -> Result<()> {
        self.store.clear_attempt_state(key).await
    }
}
