//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account;
mod gate;
mod ledger;
mod throttle;

pub use account::{AccountService, NewAccount, Registration};
pub use gate::{Authorization, CredentialGate};
pub use ledger::{AccountStatement, LedgerEngine};
pub use throttle::{AttemptThrottle, ThrottlePolicy};
