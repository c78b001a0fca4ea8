//! Vault module: the boundary with secret storage.
//!
//! This module provides:
//! - `SecretRecord`, `SecretAttributes` and `SecretMetadata` (`record`)
//! - The `VaultClient` trait and the in-memory `MemoryVault` (`client`)
//! - A local JSON-file vault with atomic writes (`file_store`)
//! - Saga-style execution of write plans (`executor`)

pub mod client;
pub mod executor;
pub mod file_store;
pub mod record;

// Re-export the most commonly used items.
pub use client::{MemoryVault, VaultClient};
pub use executor::{execute_plan, ExecutionOutcome};
pub use file_store::FileVault;
pub use record::{SecretAttributes, SecretMetadata, SecretRecord};
