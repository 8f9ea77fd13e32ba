//! Ledger engine - balance mutation and transaction history

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{
    inbound_transfer_narrative, outbound_transfer_narrative, Account, BalanceHead, Direction,
    HistoryOrder, TransactionRecord, DEPOSIT_NARRATIVE, WITHDRAW_NARRATIVE,
};
use crate::ports::{AccountStore, BalanceWrite};

/// Balance writes retry on version conflicts this many times before the
/// operation is reported as contended. Each retry re-reads the head, so a
/// conflict only recurs while other writers keep landing first.
const MAX_BALANCE_RETRIES: u32 = 32;

/// Combined balance + history view for one account
#[derive(Debug, Clone, Serialize)]
pub struct AccountStatement {
    pub account_number: String,
    pub balance: Decimal,
    pub records: Vec<TransactionRecord>,
}

/// Orchestrates deposits, withdrawals and transfers against the store,
/// enforcing the balance invariants and producing transaction records.
///
/// Every mutation is a read-check-swap loop over the head's version stamp:
/// a concurrent write invalidates the snapshot and the whole sequence,
/// including the funds check, runs again. The balance write and its record
/// commit as one unit, so no completed movement is ever missing its entry.
pub struct LedgerEngine {
    store: Arc<dyn AccountStore>,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Current balance for `username`
    pub async fn balance_of(&self, username: &str) -> Result<Decimal> {
        let head = self.head_for(username).await?;
        Ok(head.balance)
    }

    /// Add `amount` to the account and append an inbound record
    pub async fn deposit(&self, username: &str, amount: Decimal) -> Result<Decimal> {
        ensure_positive(amount)?;
        for _ in 0..MAX_BALANCE_RETRIES {
            let head = self.head_for(username).await?;
            let new_balance = head.balance + amount;
            let write = BalanceWrite {
                account_number: head.account_number.clone(),
                expected_version: head.version,
                new_balance,
            };
            let record = TransactionRecord::new(
                head.account_number.clone(),
                Direction::Inbound,
                DEPOSIT_NARRATIVE,
                amount,
            );
            if self.store.commit_movement(&write, &record).await? {
                debug!(username, %amount, %new_balance, "deposit committed");
                return Ok(new_balance);
            }
        }
        Err(contended(username))
    }

    /// Subtract `amount` from the account and append an outbound record.
    /// Fails with `InsufficientFunds` when the balance cannot cover it.
    pub async fn withdraw(&self, username: &str, amount: Decimal) -> Result<Decimal> {
        ensure_positive(amount)?;
        for _ in 0..MAX_BALANCE_RETRIES {
            let head = self.head_for(username).await?;
            if head.balance < amount {
                return Err(Error::InsufficientFunds {
                    balance: head.balance,
                    requested: amount,
                });
            }
            let new_balance = head.balance - amount;
            let write = BalanceWrite {
                account_number: head.account_number.clone(),
                expected_version: head.version,
                new_balance,
            };
            let record = TransactionRecord::new(
                head.account_number.clone(),
                Direction::Outbound,
                WITHDRAW_NARRATIVE,
                amount,
            );
            if self.store.commit_movement(&write, &record).await? {
                debug!(username, %amount, %new_balance, "withdrawal committed");
                return Ok(new_balance);
            }
        }
        Err(contended(username))
    }

    /// Move `amount` from `username` to the account behind
    /// `destination_number`, appending one record on each side.
    ///
    /// Destination resolution fails before any mutation; both balance
    /// writes and both records commit as a single unit. Returns the new
    /// source balance.
    pub async fn transfer(
        &self,
        username: &str,
        destination_number: &str,
        amount: Decimal,
        note: &str,
    ) -> Result<Decimal> {
        ensure_positive(amount)?;
        let sender = self.account_for(username).await?;
        for _ in 0..MAX_BALANCE_RETRIES {
            let source = self.head_for(username).await?;
            let destination = self
                .store
                .balance_by_account_number(destination_number)
                .await?
                .ok_or_else(|| Error::destination_not_found(destination_number))?;
            if destination.account_number == source.account_number {
                // Must resolve to another account
                return Err(Error::destination_not_found(destination_number));
            }
            if source.balance < amount {
                return Err(Error::InsufficientFunds {
                    balance: source.balance,
                    requested: amount,
                });
            }
            let recipient = self
                .store
                .find_by_username(&destination.username)
                .await?
                .ok_or_else(|| Error::destination_not_found(destination_number))?;

            let debit = BalanceWrite {
                account_number: source.account_number.clone(),
                expected_version: source.version,
                new_balance: source.balance - amount,
            };
            let credit = BalanceWrite {
                account_number: destination.account_number.clone(),
                expected_version: destination.version,
                new_balance: destination.balance + amount,
            };
            let outbound = TransactionRecord::new(
                source.account_number.clone(),
                Direction::Outbound,
                outbound_transfer_narrative(&recipient.full_name, &destination.account_number, note),
                amount,
            );
            let mut inbound = TransactionRecord::new(
                destination.account_number.clone(),
                Direction::Inbound,
                inbound_transfer_narrative(&sender.full_name, &source.account_number, note),
                amount,
            );
            inbound.timestamp = outbound.timestamp;

            if self
                .store
                .commit_transfer(&debit, &credit, &outbound, &inbound)
                .await?
            {
                debug!(
                    username,
                    destination_number,
                    %amount,
                    "transfer committed"
                );
                return Ok(debit.new_balance);
            }
        }
        Err(contended(username))
    }

    /// Records for the account, optionally filtered by direction,
    /// ordered by timestamp
    pub async fn transaction_history(
        &self,
        username: &str,
        direction: Option<Direction>,
        order: HistoryOrder,
    ) -> Result<Vec<TransactionRecord>> {
        let head = self.head_for(username).await?;
        self.store
            .transactions_for(&head.account_number, direction, order)
            .await
    }

    /// History plus the balance info callers almost always want with it
    pub async fn statement(
        &self,
        username: &str,
        direction: Option<Direction>,
        order: HistoryOrder,
    ) -> Result<AccountStatement> {
        let head = self.head_for(username).await?;
        let records = self
            .store
            .transactions_for(&head.account_number, direction, order)
            .await?;
        Ok(AccountStatement {
            account_number: head.account_number,
            balance: head.balance,
            records,
        })
    }

    async fn account_for(&self, username: &str) -> Result<Account> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| Error::account_not_found(username))
    }

    async fn head_for(&self, username: &str) -> Result<BalanceHead> {
        self.store
            .balance_by_username(username)
            .await?
            .ok_or_else(|| Error::account_not_found(username))
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}

fn contended(username: &str) -> Error {
    Error::storage(format!("balance update contention for {username}"))
}
