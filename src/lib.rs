//! Solana Wallet Manager
//!
//! Keeps named ed25519 keypairs in a local JSON wallet file and drives
//! balance checks, faucet airdrops and SOL transfers against a cluster.

pub mod cli;
pub mod config;
pub mod ledger;
pub mod manager;
pub mod operator;
pub mod pipeline;
pub mod storage;
pub mod types;
