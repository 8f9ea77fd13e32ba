//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod attempt;
pub mod result;
mod transaction;

pub use account::{
    generate_account_number, Account, AccountInfo, BalanceHead, ProfileUpdate, ACCOUNT_NUMBER_LEN,
};
pub use attempt::AttemptState;
pub use transaction::{
    inbound_transfer_narrative, outbound_transfer_narrative, Direction, HistoryOrder,
    TransactionRecord, DEPOSIT_NARRATIVE, WITHDRAW_NARRATIVE,
};
