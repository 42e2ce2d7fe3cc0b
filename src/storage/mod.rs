//! Storage layer for wallet data
//!
//! Manages keypairs, the wallet record model, and the wallet file.

pub mod file_system;
pub mod keys;
pub mod models;

pub use file_system::{SelectionCriterion, StoreError, WalletStore};
pub use keys::{Address, KeyError, Keypair, SecretKeyBytes};
pub use models::WalletRecord;
