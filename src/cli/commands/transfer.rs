//! SOL transfer command implementation

use crate::cli::commands::balance::criterion;
use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::ledger::{validate_recipient, LedgerError};
use crate::manager::{ManagerError, WalletManager};
use crate::operator::TerminalOperator;
use crate::pipeline::{ReconcileOutcome, TransferOutcome, TransferRequest, TransferStage};
use crate::storage::keys::KeyError;
use crate::types::{format_sol, AmountInput};

#[derive(Debug, thiserror::Error)]
pub enum TransferCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(#[from] KeyError),

    #[error("Invalid amount '{0}': expected a positive number of SOL")]
    InvalidAmount(String),

    #[error("Transfer did not complete (failed while {0:?})")]
    Failed(TransferStage),

    #[error("Transfer outcome unknown; run `balance` before retrying")]
    Unconfirmed,
}

/// Send SOL from a managed wallet to `address`
pub fn send(
    wallet_name: Option<String>,
    address: String,
    amount: String,
    overrides: ConfigOverrides,
) -> Result<(), TransferCommandError> {
    // Reject bad input before touching the wallet file or the network
    validate_recipient(&address)?;
    let lamports = match AmountInput::parse_sol(&amount) {
        AmountInput::Valid(lamports) => lamports,
        AmountInput::Invalid => return Err(TransferCommandError::InvalidAmount(amount)),
    };

    let config = load_config(None, overrides)?;
    let mut manager = WalletManager::new(config)?;
    let mut operator = TerminalOperator::new();

    let Some(name) = manager.select_wallet(&criterion(wallet_name), &mut operator) else {
        return Ok(());
    };

    println!("📤 Sending {} to {}", format_sol(lamports), address);

    let request = TransferRequest {
        recipient: address,
        lamports,
    };
    let report = manager.transfer(&name, &request, &mut operator)?;

    match report.outcome {
        TransferOutcome::Completed { id, fee, reconcile } => {
            println!();
            println!("✓ Transfer complete");
            println!("  Signature: {}", id);
            println!("  Fee:       {}", format_sol(fee));
            if let ReconcileOutcome::Updated { new, .. } | ReconcileOutcome::Unchanged { balance: new } =
                reconcile
            {
                println!("  Balance:   {}", format_sol(new));
            }
            Ok(())
        }
        TransferOutcome::Aborted { .. } => Ok(()),
        TransferOutcome::Failed {
            stage: TransferStage::AwaitingFinality,
            error: LedgerError::Timeout(_) | LedgerError::Http(_) | LedgerError::Rpc { .. },
        } => Err(TransferCommandError::Unconfirmed),
        TransferOutcome::Failed { stage, .. } => Err(TransferCommandError::Failed(stage)),
    }
}
