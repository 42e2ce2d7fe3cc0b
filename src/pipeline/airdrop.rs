//! Faucet airdrop pipeline
//!
//! Request → await confirmation → reconcile. Reconciliation runs whether or
//! not the request went through, so the operator always ends up looking at
//! the ledger's current balance.

use crate::ledger::{LedgerClient, LedgerError, TransactionId};
use crate::operator::Operator;
use crate::pipeline::reconcile::{BalanceReconciler, ReconcileOutcome};
use crate::storage::WalletStore;
use crate::types::lamports_to_sol;

/// Error type for airdrop operations
#[derive(Debug, thiserror::Error)]
pub enum AirdropError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result of an airdrop run
#[derive(Debug)]
pub struct AirdropReport {
    /// Lamports the operator asked for
    pub requested: u64,

    /// Lamports actually requested from the faucet
    pub granted: u64,

    /// Faucet transaction, if the request was accepted
    pub id: Option<TransactionId>,

    /// Whether the faucet transaction reached the configured commitment
    pub confirmed: bool,

    /// Request or confirmation failure, if any
    pub error: Option<LedgerError>,

    pub reconcile: ReconcileOutcome,
}

impl AirdropReport {
    pub fn was_clamped(&self) -> bool {
        self.granted < self.requested
    }
}

/// Runs faucet requests capped at a fixed ceiling
pub struct AirdropPipeline<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
    ceiling: u64,
}

impl<'a, L: LedgerClient + ?Sized> AirdropPipeline<'a, L> {
    /// `ceiling` is the largest request, in lamports, sent to the faucet
    pub fn new(ledger: &'a L, ceiling: u64) -> Self {
        Self { ledger, ceiling }
    }

    /// Request `lamports` for the wallet `name`
    pub fn run(
        &self,
        store: &mut WalletStore,
        name: &str,
        lamports: u64,
        operator: &mut dyn Operator,
    ) -> Result<AirdropReport, AirdropError> {
        let address = store
            .get(name)
            .map(|record| record.address())
            .ok_or_else(|| AirdropError::WalletNotFound(name.to_string()))?;
        if lamports == 0 {
            return Err(AirdropError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }

        let granted = if lamports > self.ceiling {
            operator.warn(&format!(
                "Requested {} SOL exceeds the maximum allowed airdrop. Setting amount to the maximum allowed ({} SOL).",
                lamports_to_sol(lamports),
                lamports_to_sol(self.ceiling)
            ));
            self.ceiling
        } else {
            operator.notify(&format!(
                "Chosen amount to airdrop is {} SOL.",
                lamports_to_sol(lamports)
            ));
            lamports
        };

        let mut id = None;
        let mut confirmed = false;
        let mut error = None;

        match self.ledger.request_faucet(&address, granted) {
            Ok(signature) => {
                match self.ledger.confirm_transaction(&signature, None) {
                    Ok(true) => {
                        confirmed = true;
                        operator.notify(&format!(
                            "Airdrop of {} SOL confirmed: {}",
                            lamports_to_sol(granted),
                            signature
                        ));
                    }
                    Ok(false) => {
                        operator.warn(&format!("Airdrop {} was rejected by the ledger.", signature));
                        error = Some(LedgerError::Rejected(signature.to_string()));
                    }
                    Err(e) => {
                        operator.warn(&format!("Error while confirming airdrop {}: {}", signature, e));
                        error = Some(e);
                    }
                }
                id = Some(signature);
            }
            Err(e) => {
                operator.warn(&format!("Error while handling airdrop: {}", e));
                error = Some(e);
            }
        }

        let reconcile = BalanceReconciler::new(self.ledger).reconcile(store, name, operator);

        Ok(AirdropReport {
            requested: lamports,
            granted,
            id,
            confirmed,
            error,
            reconcile,
        })
    }
}
