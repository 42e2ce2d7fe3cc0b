//! Balance and airdrop command implementations

use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::manager::{ManagerError, WalletManager};
use crate::operator::{Operator, TerminalOperator};
use crate::storage::SelectionCriterion;
use crate::types::{format_sol, AmountInput};

#[derive(Debug, thiserror::Error)]
pub enum BalanceCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),
}

pub(crate) fn criterion(wallet_name: Option<String>) -> SelectionCriterion {
    match wallet_name {
        Some(name) => SelectionCriterion::ByName(name),
        None => SelectionCriterion::Interactive,
    }
}

/// Check a wallet's balance against the ledger and update the record
pub fn balance(
    wallet_name: Option<String>,
    overrides: ConfigOverrides,
) -> Result<(), BalanceCommandError> {
    let config = load_config(None, overrides)?;
    let mut manager = WalletManager::new(config)?;
    let mut operator = TerminalOperator::new();

    let Some(name) = manager.select_wallet(&criterion(wallet_name), &mut operator) else {
        return Ok(());
    };

    manager.refresh_balance(&name, &mut operator);
    Ok(())
}

/// Request an airdrop for a wallet
///
/// `amount` is in SOL. Unusable amounts fall back to the configured maximum.
pub fn airdrop(
    wallet_name: Option<String>,
    amount: Option<String>,
    overrides: ConfigOverrides,
) -> Result<(), BalanceCommandError> {
    let config = load_config(None, overrides)?;
    let max_lamports = config.airdrop.max_lamports;
    let mut manager = WalletManager::new(config)?;
    let mut operator = TerminalOperator::new();

    let Some(name) = manager.select_wallet(&criterion(wallet_name), &mut operator) else {
        return Ok(());
    };

    let lamports = amount.map(|raw| match AmountInput::parse_sol(&raw) {
        AmountInput::Valid(lamports) => lamports,
        AmountInput::Invalid => {
            operator.warn(&format!(
                "Invalid amount '{}'. Setting amount to the maximum allowed ({}).",
                raw,
                format_sol(max_lamports)
            ));
            max_lamports
        }
    });

    let report = manager.airdrop(&name, lamports, &mut operator)?;
    if report.confirmed {
        println!("✓ Airdrop of {} complete", format_sol(report.granted));
    }

    Ok(())
}
