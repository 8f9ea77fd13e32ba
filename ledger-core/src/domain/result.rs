//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;

/// Core library error type
///
/// Semantic failures each carry their own kind so callers can tell an
/// invalid operation apart from an unavailable store (`Storage`). Store
/// faults must never be masked behind a semantic kind.
#[derive(Error, Debug)]
pub enum Error {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("destination account not found: {0}")]
    DestinationNotFound(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
    },

    #[error("identity already registered: {0}")]
    DuplicateIdentity(String),

    #[error("locked after too many failed attempts")]
    Locked,

    #[error("credential rejected")]
    CredentialRejected,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl Error {
    /// Create an account-not-found error
    pub fn account_not_found(username: impl Into<String>) -> Self {
        Self::AccountNotFound(username.into())
    }

    /// Create a destination-not-found error
    pub fn destination_not_found(account_number: impl Into<String>) -> Self {
        Self::DestinationNotFound(account_number.into())
    }

    /// Create a duplicate-identity error
    pub fn duplicate_identity(identity: impl Into<String>) -> Self {
        Self::DuplicateIdentity(identity.into())
    }

    /// Create an opaque storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::account_not_found("alice");
        assert_eq!(err.to_string(), "account not found: alice");

        let err = Error::InsufficientFunds {
            balance: Decimal::from(700),
            requested: Decimal::from(800),
        };
        assert!(err.to_string().contains("700"));
        assert!(err.to_string().contains("800"));
    }

    #[test]
    fn test_storage_errors_stay_distinguishable() {
        let err = Error::storage("connection refused");
        assert!(matches!(err, Error::Storage(_)));
        assert!(!matches!(err, Error::AccountNotFound(_)));
    }
}
