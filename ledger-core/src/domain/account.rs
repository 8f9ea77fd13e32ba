//! Account domain model

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered account: the profile fields plus the credential digest.
///
/// Owned exclusively by the store. The monetary state lives in a separate
/// [`BalanceHead`] so it can be versioned and swapped independently of the
/// profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique login name
    pub username: String,
    pub full_name: String,
    pub birth_place: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// PHC-format digest produced by the hashing collaborator
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Validate profile data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username cannot be empty");
        }
        if !self.email.contains('@') {
            return Err("email must contain '@'");
        }
        if self.phone.trim().is_empty() {
            return Err("phone cannot be empty");
        }
        Ok(())
    }
}

/// Profile view handed to callers; never exposes the credential digest
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub username: String,
    pub full_name: String,
    pub birth_place: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            birth_place: account.birth_place.clone(),
            birth_date: account.birth_date,
            gender: account.gender.clone(),
            address: account.address.clone(),
            phone: account.phone.clone(),
            email: account.email.clone(),
        }
    }
}

/// Replacement profile fields for an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub birth_place: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

/// The mutable monetary state of one account.
///
/// `version` is bumped on every successful balance write and guards the
/// store's compare-and-swap operations: a write carrying a stale version is
/// rejected, which keeps concurrent read-then-write sequences from losing
/// updates or overdrawing the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceHead {
    pub account_number: String,
    pub username: String,
    pub balance: Decimal,
    pub version: u64,
}

impl BalanceHead {
    /// Fresh zero-balance head for a new account
    pub fn new(account_number: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            username: username.into(),
            balance: Decimal::ZERO,
            version: 0,
        }
    }
}

/// Length of generated account numbers
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// Generate a random numeric account number
pub fn generate_account_number() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCOUNT_NUMBER_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
