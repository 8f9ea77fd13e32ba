//! In-memory account store
//!
//! Backs the `AccountStore` port with plain maps behind a single mutex.
//! Every trait call takes the lock exactly once, which makes the multi-write
//! `commit_*` units atomic without further machinery. Durable drivers
//! implement the same port behind their own transaction scope.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, AttemptState, BalanceHead, Direction, HistoryOrder, ProfileUpdate, TransactionRecord,
};
use crate::ports::{AccountStore, BalanceWrite};

#[derive(Default)]
struct State {
    /// Profiles keyed by username
    accounts: HashMap<String, Account>,
    /// Balance heads keyed by account number
    balances: HashMap<String, BalanceHead>,
    /// Append-only record log
    transactions: Vec<TransactionRecord>,
    /// Attempt records keyed by identity key
    attempts: HashMap<String, AttemptState>,
}

impl State {
    fn apply_write(&mut self, write: &BalanceWrite) -> Result<bool> {
        let head = self
            .balances
            .get_mut(&write.account_number)
            .ok_or_else(|| Error::account_not_found(&write.account_number))?;
        if head.version != write.expected_version {
            return Ok(false);
        }
        head.balance = write.new_balance;
        head.version += 1;
        Ok(true)
    }

    fn version_matches(&self, write: &BalanceWrite) -> Result<bool> {
        let head = self
            .balances
            .get(&write.account_number)
            .ok_or_else(|| Error::account_not_found(&write.account_number))?;
        Ok(head.version == write.expected_version)
    }
}

/// In-memory `AccountStore` implementation
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| Error::storage(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: &Account, head: &BalanceHead) -> Result<()> {
        let mut state = self.lock()?;
        if state.accounts.contains_key(&account.username) {
            return Err(Error::duplicate_identity(&account.username));
        }
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(Error::duplicate_identity(&account.email));
        }
        if state.accounts.values().any(|a| a.phone == account.phone) {
            return Err(Error::duplicate_identity(&account.phone));
        }
        if state.balances.contains_key(&head.account_number) {
            return Err(Error::duplicate_identity(&head.account_number));
        }
        state
            .accounts
            .insert(account.username.clone(), account.clone());
        state
            .balances
            .insert(head.account_number.clone(), head.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let state = self.lock()?;
        Ok(state.accounts.get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let state = self.lock()?;
        Ok(state.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>> {
        let state = self.lock()?;
        Ok(state.accounts.values().find(|a| a.phone == phone).cloned())
    }

    async fn update_profile(&self, username: &str, update: &ProfileUpdate) -> Result<()> {
        let mut state = self.lock()?;
        if !state.accounts.contains_key(username) {
            return Err(Error::account_not_found(username));
        }
        let email_taken = state
            .accounts
            .values()
            .any(|a| a.username != username && a.email == update.email);
        if email_taken {
            return Err(Error::duplicate_identity(&update.email));
        }
        let phone_taken = state
            .accounts
            .values()
            .any(|a| a.username != username && a.phone == update.phone);
        if phone_taken {
            return Err(Error::duplicate_identity(&update.phone));
        }
        let account = state
            .accounts
            .get_mut(username)
            .ok_or_else(|| Error::account_not_found(username))?;
        account.full_name = update.full_name.clone();
        account.birth_place = update.birth_place.clone();
        account.birth_date = update.birth_date;
        account.gender = update.gender.clone();
        account.address = update.address.clone();
        account.phone = update.phone.clone();
        account.email = update.email.clone();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn update_password(&self, username: &str, digest: &str) -> Result<()> {
        let mut state = self.lock()?;
        let account = state
            .accounts
            .get_mut(username)
            .ok_or_else(|| Error::account_not_found(username))?;
        account.password_digest = digest.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_account(&self, username: &str) -> Result<()> {
        let mut state = self.lock()?;
        if state.accounts.remove(username).is_none() {
            return Err(Error::account_not_found(username));
        }
        state.balances.retain(|_, head| head.username != username);
        state.attempts.remove(username);
        // Transaction rows stay: they are append-only audit data keyed by
        // account number.
        Ok(())
    }

    async fn balance_by_username(&self, username: &str) -> Result<Option<BalanceHead>> {
        let state = self.lock()?;
        Ok(state
            .balances
            .values()
            .find(|head| head.username == username)
            .cloned())
    }

    async fn balance_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<BalanceHead>> {
        let state = self.lock()?;
        Ok(state.balances.get(account_number).cloned())
    }

    async fn compare_and_swap_balance(&self, write: &BalanceWrite) -> Result<bool> {
        let mut state = self.lock()?;
        state.apply_write(write)
    }

    async fn commit_movement(
        &self,
        write: &BalanceWrite,
        record: &TransactionRecord,
    ) -> Result<bool> {
        let mut state = self.lock()?;
        if !state.apply_write(write)? {
            return Ok(false);
        }
        state.transactions.push(record.clone());
        Ok(true)
    }

    async fn commit_transfer(
        &self,
        debit: &BalanceWrite,
        credit: &BalanceWrite,
        outbound: &TransactionRecord,
        inbound: &TransactionRecord,
    ) -> Result<bool> {
        let mut state = self.lock()?;
        // Check both versions before touching either side
        if !state.version_matches(debit)? || !state.version_matches(credit)? {
            return Ok(false);
        }
        state.apply_write(debit)?;
        state.apply_write(credit)?;
        state.transactions.push(outbound.clone());
        state.transactions.push(inbound.clone());
        Ok(true)
    }

    async fn append_transaction(&self, record: &TransactionRecord) -> Result<()> {
        let mut state = self.lock()?;
        state.transactions.push(record.clone());
        Ok(())
    }

    async fn transactions_for(
        &self,
        account_number: &str,
        direction: Option<Direction>,
        order: HistoryOrder,
    ) -> Result<Vec<TransactionRecord>> {
        let state = self.lock()?;
        let mut records: Vec<TransactionRecord> = state
            .transactions
            .iter()
            .filter(|r| r.account_number == account_number)
            .filter(|r| direction.map_or(true, |d| r.direction == d))
            .cloned()
            .collect();
        match order {
            HistoryOrder::OldestFirst => records.sort_by_key(|r| r.timestamp),
            HistoryOrder::NewestFirst => records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        }
        Ok(records)
    }

    async fn attempt_state(&self, key: &str) -> Result<Option<AttemptState>> {
        let state = self.lock()?;
        Ok(state.attempts.get(key).cloned())
    }

    async fn put_attempt_state(&self, attempt: &AttemptState) -> Result<()> {
        let mut state = self.lock()?;
        state.attempts.insert(attempt.key.clone(), attempt.clone());
        Ok(())
    }

    async fn clear_attempt_state(&self, key: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.attempts.remove(key);
        Ok(())
    }
}
