//! Balance reconciliation
//!
//! Brings a wallet's cached balance in line with the ledger.

use crate::ledger::LedgerClient;
use crate::operator::Operator;
use crate::storage::WalletStore;
use crate::types::lamports_to_sol;

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Cached balance already matched the ledger; nothing was written
    Unchanged { balance: u64 },

    /// Cached balance was replaced with the ledger value
    Updated { old: u64, new: u64 },

    /// Ledger could not be queried; cached balance left as is
    Unavailable { error: String },
}

/// Compares cached balances with the ledger
pub struct BalanceReconciler<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerClient + ?Sized> BalanceReconciler<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Reconcile the wallet called `name`
    ///
    /// Never fails: ledger and write errors are reported to the operator and
    /// reflected in the outcome.
    pub fn reconcile(
        &self,
        store: &mut WalletStore,
        name: &str,
        operator: &mut dyn Operator,
    ) -> ReconcileOutcome {
        let (address, old) = match store.get(name) {
            Some(record) => (record.address(), record.balance()),
            None => {
                let error = format!("wallet '{}' is not in the store", name);
                operator.warn(&format!("Could not check balance: {}", error));
                return ReconcileOutcome::Unavailable { error };
            }
        };

        let new = match self.ledger.get_balance(&address) {
            Ok(balance) => balance,
            Err(e) => {
                log::warn!("Balance query for {} failed: {}", address, e);
                operator.warn(&format!(
                    "Could not fetch the balance of wallet '{}': {}. Keeping the recorded {} SOL.",
                    name,
                    e,
                    lamports_to_sol(old)
                ));
                return ReconcileOutcome::Unavailable {
                    error: e.to_string(),
                };
            }
        };

        if new == old {
            operator.notify(&format!(
                "Your balance on the wallet named '{}' is the same as recorded. Your balance: {} SOL",
                name,
                lamports_to_sol(new)
            ));
            return ReconcileOutcome::Unchanged { balance: new };
        }

        operator.notify(&format!(
            "Your balance on the wallet named '{}' has been updated from '{}' SOL to '{}' SOL.",
            name,
            lamports_to_sol(old),
            lamports_to_sol(new)
        ));

        if let Err(e) = store.set_balance(name, new) {
            log::error!("Failed to persist balance of '{}': {}", name, e);
            operator.warn(&format!(
                "Error writing to {}: {}. The new balance is kept for this run only.",
                store.path().display(),
                e
            ));
        }

        ReconcileOutcome::Updated { old, new }
    }
}
