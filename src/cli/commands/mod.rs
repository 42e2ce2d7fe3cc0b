//! CLI command implementations

pub mod balance;
pub mod config;
pub mod transfer;
pub mod wallet;
