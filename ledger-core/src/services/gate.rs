//! Credential gate - password verification behind the attempt throttle

use std::sync::Arc;

use tracing::warn;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::{AccountStore, PasswordHasher};
use crate::services::AttemptThrottle;

/// Hashed once at construction; never a valid credential for any account.
/// Unknown identities are verified against this digest so that response
/// timing does not reveal whether an identity exists.
const PLACEHOLDER_SECRET: &str = "<placeholder-credential>";

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Rejected,
    Locked,
}

impl Authorization {
    /// Collapse into a `Result` for callers guarding an operation
    pub fn into_result(self) -> Result<()> {
        match self {
            Authorization::Authorized => Ok(()),
            Authorization::Rejected => Err(Error::CredentialRejected),
            Authorization::Locked => Err(Error::Locked),
        }
    }
}

/// Wraps credential verification with attempt throttling, independent of
/// the domain operation being guarded.
///
/// One gate is built per throttle policy, so the login and banking paths
/// keep their separate limits and lockout behavior.
pub struct CredentialGate {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    throttle: AttemptThrottle,
    placeholder_digest: String,
}

impl CredentialGate {
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        throttle: AttemptThrottle,
    ) -> Result<Self> {
        let placeholder_digest = hasher.hash(PLACEHOLDER_SECRET)?;
        Ok(Self {
            store,
            hasher,
            throttle,
            placeholder_digest,
        })
    }

    /// Authorize `secret` for the identity behind `key`.
    ///
    /// Order matters: the lockout check runs before any secret comparison,
    /// and the comparison always runs afterwards, against the placeholder
    /// digest when the key resolves to no account. Failed comparisons are
    /// recorded before the result is returned; a bookkeeping write that
    /// fails is logged and does not change the outcome.
    pub async fn authorize(&self, key: &str, secret: &str) -> Result<Authorization> {
        if self.throttle.check_and_maybe_reset(key).await? {
            return Ok(Authorization::Locked);
        }

        let account = self.resolve(key).await?;
        let digest = account
            .as_ref()
            .map(|a| a.password_digest.as_str())
            .unwrap_or(self.placeholder_digest.as_str());
        let matched = self.hasher.verify(secret, digest);

        if matched && account.is_some() {
            if let Err(err) = self.throttle.record_success(key).await {
                warn!(key, %err, "failed to reset attempt counter");
            }
            return Ok(Authorization::Authorized);
        }

        let failed_count = match self.throttle.record_failure(key).await {
            Ok(count) => count,
            Err(err) => {
                warn!(key, %err, "failed to record failed attempt");
                0
            }
        };
        if failed_count >= self.throttle.policy().limit {
            Ok(Authorization::Locked)
        } else {
            Ok(Authorization::Rejected)
        }
    }

    /// Attempts remaining before `key` locks, for caller-facing messaging
    pub async fn attempts_left(&self, key: &str) -> Result<u32> {
        let failed = self
            .store
            .attempt_state(key)
            .await?
            .map(|state| state.failed_count)
            .unwrap_or(0);
        Ok(self.throttle.policy().limit.saturating_sub(failed))
    }

    /// Identity keys resolve by username first, then by email
    async fn resolve(&self, key: &str) -> Result<Option<Account>> {
        if let Some(account) = self.store.find_by_username(key).await? {
            return Ok(Some(account));
        }
        self.store.find_by_email(key).await
    }
}
