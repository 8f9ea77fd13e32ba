//! Account service - registration and profile management

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{
    generate_account_number, Account, AccountInfo, BalanceHead, ProfileUpdate,
};
use crate::ports::{AccountStore, PasswordHasher};

/// Registration request: the profile plus the initial secret
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub full_name: String,
    pub birth_place: String,
    pub birth_date: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub account_number: String,
}

/// Registration, profile reads/updates and account closure
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Hash the secret, pick an account number and create the profile with
    /// its zero-balance head in one unit. Identity collisions surface as
    /// `DuplicateIdentity`.
    pub async fn register(&self, new: NewAccount) -> Result<Registration> {
        let digest = self.hasher.hash(&new.password)?;
        let now = Utc::now();
        let account = Account {
            username: new.username,
            full_name: new.full_name,
            birth_place: new.birth_place,
            birth_date: new.birth_date,
            gender: new.gender,
            address: new.address,
            phone: new.phone,
            email: new.email,
            password_digest: digest,
            created_at: now,
            updated_at: now,
        };
        let head = BalanceHead::new(generate_account_number(), account.username.clone());
        self.store.create_account(&account, &head).await?;
        debug!(username = %account.username, "account registered");
        Ok(Registration {
            username: account.username,
            account_number: head.account_number,
        })
    }

    /// Profile view by username, without credential material
    pub async fn account_info(&self, username: &str) -> Result<AccountInfo> {
        let account = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| Error::account_not_found(username))?;
        Ok(AccountInfo::from(&account))
    }

    /// Account number behind a username
    pub async fn account_number(&self, username: &str) -> Result<String> {
        self.store
            .balance_by_username(username)
            .await?
            .map(|head| head.account_number)
            .ok_or_else(|| Error::account_not_found(username))
    }

    /// Replace the profile fields; uniqueness is enforced except against
    /// the account's own existing values
    pub async fn update_profile(&self, username: &str, update: &ProfileUpdate) -> Result<()> {
        self.store.update_profile(username, update).await
    }

    /// Hash and store a new secret
    pub async fn change_password(&self, username: &str, new_password: &str) -> Result<()> {
        let digest = self.hasher.hash(new_password)?;
        self.store.update_password(username, &digest).await?;
        debug!(username, "password changed");
        Ok(())
    }

    /// Close the account. The profile and balance head are removed;
    /// transaction history stays readable by account number.
    pub async fn close_account(&self, username: &str) -> Result<()> {
        self.store.delete_account(username).await?;
        debug!(username, "account closed");
        Ok(())
    }
}
