//! Password hashing port

use crate::domain::result::Result;

/// Credential-hashing collaborator.
///
/// `verify` must cost the same for matching and non-matching secrets so that
/// callers can compare against a placeholder digest without response timing
/// revealing whether an identity exists.
pub trait PasswordHasher: Send + Sync {
    /// Hash a secret into a self-describing digest string
    fn hash(&self, secret: &str) -> Result<String>;

    /// Check a secret against a digest
    fn verify(&self, secret: &str, digest: &str) -> bool;
}
