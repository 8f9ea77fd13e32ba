//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - In-memory maps for the AccountStore port
//! - Argon2id for the PasswordHasher port

pub mod argon2;
pub mod memory;

pub use argon2::Argon2Hasher;
pub use memory::MemoryStore;
