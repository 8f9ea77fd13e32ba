//! Account store port - data-access abstraction

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::result::Result;
use crate::domain::{
    Account, AttemptState, BalanceHead, Direction, HistoryOrder, ProfileUpdate, TransactionRecord,
};

/// A versioned balance write.
///
/// Applied only while the head still carries `expected_version`; a stale
/// version leaves the store untouched.
#[derive(Debug, Clone)]
pub struct BalanceWrite {
    pub account_number: String,
    pub expected_version: u64,
    pub new_balance: Decimal,
}

/// Data-access abstraction for accounts, balances, transaction records and
/// attempt state. No business policy lives here.
///
/// Implementations enforce the uniqueness constraints (username; email and
/// phone across other accounts) and make the `commit_*` operations atomic:
/// either every write in the unit lands or none does.
#[async_trait]
pub trait AccountStore: Send + Sync {
    // === Accounts ===

    /// Atomically create the profile and its zero-balance head.
    /// Fails with `DuplicateIdentity` on a username, email or phone collision.
    async fn create_account(&self, account: &Account, head: &BalanceHead) -> Result<()>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>>;

    /// Replace the profile fields. Email/phone uniqueness is enforced against
    /// other accounts only, so updating an account to its own existing values
    /// always succeeds.
    async fn update_profile(&self, username: &str, update: &ProfileUpdate) -> Result<()>;

    async fn update_password(&self, username: &str, digest: &str) -> Result<()>;

    /// Remove the profile and balance head. Transaction history is retained;
    /// any attempt state stored under the username is cleared.
    async fn delete_account(&self, username: &str) -> Result<()>;

    // === Balances ===

    async fn balance_by_username(&self, username: &str) -> Result<Option<BalanceHead>>;

    async fn balance_by_account_number(&self, account_number: &str)
        -> Result<Option<BalanceHead>>;

    /// Swap a balance without appending a record. Returns false when the
    /// head version is stale.
    async fn compare_and_swap_balance(&self, write: &BalanceWrite) -> Result<bool>;

    /// Atomically apply one balance write and append its record.
    /// Returns false, changing nothing, when the version is stale.
    async fn commit_movement(
        &self,
        write: &BalanceWrite,
        record: &TransactionRecord,
    ) -> Result<bool>;

    /// Atomically apply both sides of a transfer and append both records.
    /// Returns false, changing nothing, when either version is stale.
    async fn commit_transfer(
        &self,
        debit: &BalanceWrite,
        credit: &BalanceWrite,
        outbound: &TransactionRecord,
        inbound: &TransactionRecord,
    ) -> Result<bool>;

    // === Transaction records ===

    async fn append_transaction(&self, record: &TransactionRecord) -> Result<()>;

    /// List records for an account, optionally filtered by direction,
    /// ordered by timestamp.
    async fn transactions_for(
        &self,
        account_number: &str,
        direction: Option<Direction>,
        order: HistoryOrder,
    ) -> Result<Vec<TransactionRecord>>;

    // === Attempt state ===

    async fn attempt_state(&self, key: &str) -> Result<Option<AttemptState>>;

    async fn put_attempt_state(&self, state: &AttemptState) -> Result<()>;

    async fn clear_attempt_state(&self, key: &str) -> Result<()>;
}
