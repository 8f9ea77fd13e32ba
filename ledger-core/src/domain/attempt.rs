//! Failed-attempt tracking state

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-identity failed-attempt record, created lazily on the first failure.
///
/// A missing record always reads as zero failures and not locked. The count
/// only grows between resets; a reset removes the record entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptState {
    /// Identity key (username or email)
    pub key: String,
    pub failed_count: u32,
    /// When set, the lockout clears itself once this instant passes.
    /// Stays `None` under policies without auto-expiry.
    pub lockout_expires_at: Option<DateTime<Utc>>,
}

impl AttemptState {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            failed_count: 0,
            lockout_expires_at: None,
        }
    }

    /// True when an expiry exists and has already passed
    pub fn lockout_expired(&self, now: DateTime<Utc>) -> bool {
        self.lockout_expires_at.map_or(false, |at| at <= now)
    }

    /// Record one more failure. Arms the lockout timer the moment the count
    /// reaches `limit`, if the policy carries a duration.
    pub fn register_failure(&mut self, limit: u32, lockout: Option<Duration>, now: DateTime<Utc>) {
        self.failed_count += 1;
        if self.failed_count >= limit && self.lockout_expires_at.is_none() {
            self.lockout_expires_at = lockout.map(|duration| now + duration);
        }
    }
}
