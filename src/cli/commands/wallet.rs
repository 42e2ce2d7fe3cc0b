//! Wallet command implementations

use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::manager::{ManagerError, WalletManager};
use crate::types::format_sol;

#[derive(Debug, thiserror::Error)]
pub enum WalletCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("Invalid command. Use `new --create <wallet_name>`, see --help for usage information")]
    MissingName,
}

/// Generate a keypair and register it under `name`
pub fn create(name: Option<String>, overrides: ConfigOverrides) -> Result<(), WalletCommandError> {
    let name = name.ok_or(WalletCommandError::MissingName)?;

    let config = load_config(None, overrides)?;
    let mut manager = WalletManager::new(config)?;

    let address = manager.create_wallet(&name)?;

    println!("✓ Wallet '{}' created successfully", name.trim());
    println!();
    println!("  Public Key:  {}", address);
    println!("  Wallet file: {}", manager.store().path().display());

    Ok(())
}

/// List all wallets with their recorded balances (no network access)
pub fn list(overrides: ConfigOverrides) -> Result<(), WalletCommandError> {
    let config = load_config(None, overrides)?;
    let manager = WalletManager::new(config)?;
    let wallets = manager.store().records();

    if wallets.is_empty() {
        println!("No wallets found.");
        println!();
        println!("Create a new wallet with:");
        println!("  solana-wallet-manager new --create <name>");
        return Ok(());
    }

    println!("Wallets ({}):", wallets.len());
    println!();

    for (index, wallet) in wallets.iter().enumerate() {
        println!("  [{}] {}", index + 1, wallet.name());
        println!("    Public Key: {}", wallet.address());
        println!("    Recorded:   {}", format_sol(wallet.balance()));
        println!();
    }

    Ok(())
}
