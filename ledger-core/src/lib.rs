//! Ledger Core - account balances, transaction history and attempt throttling
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, TransactionRecord, AttemptState)
//! - **ports**: Trait definitions for external dependencies (AccountStore, PasswordHasher)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (in-memory store, Argon2 hashing)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::sync::Arc;

use adapters::{Argon2Hasher, MemoryStore};
use config::Config;
use ports::{AccountStore, PasswordHasher};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    Account, AccountInfo, AttemptState, BalanceHead, Direction, HistoryOrder, ProfileUpdate,
    TransactionRecord,
};
pub use services::{
    AccountService, AccountStatement, AttemptThrottle, Authorization, CredentialGate,
    LedgerEngine, NewAccount, Registration, ThrottlePolicy,
};

/// Main context for ledger operations
///
/// This is the primary entry point for callers. It holds the store handle,
/// configuration and all services, wired once at startup.
pub struct LedgerContext {
    pub config: Config,
    pub store: Arc<dyn AccountStore>,
    pub accounts: AccountService,
    pub ledger: LedgerEngine,
    /// Gate for login-style authorization (auto-expiring lockout)
    pub login_gate: CredentialGate,
    /// Gate for balance-mutating operations (locked until explicit reset)
    pub banking_gate: CredentialGate,
}

impl LedgerContext {
    /// Wire a context over any store and hasher pair
    pub fn new(
        store: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        config: Config,
    ) -> Result<Self> {
        let accounts = AccountService::new(Arc::clone(&store), Arc::clone(&hasher));
        let ledger = LedgerEngine::new(Arc::clone(&store));
        let login_gate = CredentialGate::new(
            Arc::clone(&store),
            Arc::clone(&hasher),
            AttemptThrottle::new(Arc::clone(&store), config.login_throttle.policy()),
        )?;
        let banking_gate = CredentialGate::new(
            Arc::clone(&store),
            Arc::clone(&hasher),
            AttemptThrottle::new(Arc::clone(&store), config.banking_throttle.policy()),
        )?;

        Ok(Self {
            config,
            store,
            accounts,
            ledger,
            login_gate,
            banking_gate,
        })
    }

    /// Context backed by the in-memory store and Argon2 hashing
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Argon2Hasher::new()),
            config,
        )
    }
}
