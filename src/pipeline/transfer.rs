//! SOL transfer pipeline
//!
//! Building → Quoting → AwaitingConfirmation → Signing → Submitting →
//! AwaitingFinality → Reconciling → Done, with `Aborted` reachable from the
//! confirmation prompt and `Failed` from any network step.
//!
//! The cached balance is only touched by the final reconciliation, which
//! runs after the ledger has confirmed the transfer.

use crate::ledger::{
    validate_recipient, LedgerClient, LedgerError, TransactionId, TransferInstruction,
    UnsignedTransaction,
};
use crate::operator::Operator;
use crate::pipeline::reconcile::{BalanceReconciler, ReconcileOutcome};
use crate::storage::keys::{KeyError, Keypair};
use crate::storage::WalletStore;
use crate::types::lamports_to_sol;

/// Error type for transfer operations
///
/// These are rejected inputs or unusable key material. Network problems
/// are not errors here; they end in [`TransferOutcome::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(KeyError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Sender wallet not found: {0}")]
    SenderNotFound(String),

    #[error("Cannot sign with wallet key material: {0}")]
    Signing(KeyError),
}

/// Pipeline states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Building,
    Quoting,
    AwaitingConfirmation,
    Signing,
    Submitting,
    AwaitingFinality,
    Reconciling,
    Done,
    Aborted,
    Failed,
}

/// What the operator wants to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address (base58)
    pub recipient: String,

    /// Amount in lamports
    pub lamports: u64,
}

/// Operator's answer to the fee prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Proceed,
    Decline,
    Invalid(String),
}

/// Interpret a fee prompt answer: empty or `y` proceeds, `n` declines
pub fn interpret_confirmation(answer: &str) -> ConfirmationDecision {
    let trimmed = answer.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("y") {
        ConfirmationDecision::Proceed
    } else if trimmed.eq_ignore_ascii_case("n") {
        ConfirmationDecision::Decline
    } else {
        ConfirmationDecision::Invalid(trimmed.to_string())
    }
}

/// Why a transfer stopped at the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    Declined,
    InvalidResponse(String),
    NoResponse,
}

/// How a transfer ended
#[derive(Debug)]
pub enum TransferOutcome {
    Completed {
        id: TransactionId,
        fee: u64,
        reconcile: ReconcileOutcome,
    },
    Aborted {
        fee: u64,
        reason: AbortReason,
    },
    Failed {
        stage: TransferStage,
        error: LedgerError,
    },
}

/// Outcome plus the stages the pipeline went through
#[derive(Debug)]
pub struct TransferReport {
    pub outcome: TransferOutcome,
    pub stages: Vec<TransferStage>,
}

impl TransferReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, TransferOutcome::Completed { .. })
    }

    pub fn visited(&self, stage: TransferStage) -> bool {
        self.stages.contains(&stage)
    }
}

/// Runs one transfer against a ledger
pub struct TransferPipeline<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
    stages: Vec<TransferStage>,
}

impl<'a, L: LedgerClient + ?Sized> TransferPipeline<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            stages: Vec::new(),
        }
    }

    /// Send `request.lamports` from the wallet `sender` to `request.recipient`
    pub fn run(
        mut self,
        store: &mut WalletStore,
        sender: &str,
        request: &TransferRequest,
        operator: &mut dyn Operator,
    ) -> Result<TransferReport, TransferError> {
        self.enter(TransferStage::Building);
        let (from, secret) = match store.get(sender) {
            Some(record) => (record.address(), record.secret().clone()),
            None => return Err(TransferError::SenderNotFound(sender.to_string())),
        };
        let to = validate_recipient(&request.recipient).map_err(TransferError::InvalidRecipient)?;
        if request.lamports == 0 {
            return Err(TransferError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        let instruction = TransferInstruction::new(from, to, request.lamports);

        self.enter(TransferStage::Quoting);
        let quote = self
            .ledger
            .latest_checkpoint()
            .map(|checkpoint| UnsignedTransaction::new(instruction, checkpoint))
            .and_then(|tx| self.ledger.estimate_fee(&tx).map(|fee| (tx, fee)));
        let (tx, fee) = match quote {
            Ok(quote) => quote,
            Err(e) => {
                operator.warn(&format!("Could not estimate the transaction fee: {}", e));
                return Ok(self.fail(TransferStage::Quoting, e));
            }
        };
        log::debug!(
            "Quoted {} lamports for {:?} at {:?}",
            fee,
            tx.instruction(),
            tx.checkpoint()
        );

        self.enter(TransferStage::AwaitingConfirmation);
        let question = format!(
            "Estimated fee for this transaction will be: {} SOL. Do you want to proceed with it? [Y, n] ",
            lamports_to_sol(fee)
        );
        let decision = match operator.ask(&question) {
            Ok(answer) => interpret_confirmation(&answer),
            Err(e) => {
                operator.warn(&format!("No confirmation received: {}", e));
                return Ok(self.abort(fee, AbortReason::NoResponse));
            }
        };
        match decision {
            ConfirmationDecision::Proceed => operator.notify("Proceeding with the operation..."),
            ConfirmationDecision::Decline => {
                operator.notify("Transfer cancelled. Nothing was sent.");
                return Ok(self.abort(fee, AbortReason::Declined));
            }
            ConfirmationDecision::Invalid(answer) => {
                operator.warn(&format!(
                    "Invalid input '{}'. Nothing was sent; run the command again to retry.",
                    answer
                ));
                return Ok(self.abort(fee, AbortReason::InvalidResponse(answer)));
            }
        }

        self.enter(TransferStage::Signing);
        let signed = Keypair::from_secret(&secret)
            .and_then(|keypair| tx.sign(&keypair))
            .map_err(TransferError::Signing)?;

        self.enter(TransferStage::Submitting);
        let id = match self.ledger.submit_transaction(&signed) {
            Ok(id) => id,
            Err(e) => {
                operator.warn(&format!(
                    "There was an error while sending the transaction: {}",
                    e
                ));
                return Ok(self.fail(TransferStage::Submitting, e));
            }
        };

        self.enter(TransferStage::AwaitingFinality);
        match self
            .ledger
            .confirm_transaction(&id, Some(signed.last_valid_block_height()))
        {
            Ok(true) => operator.notify(&format!(
                "Transaction successfully sent! Here is the signature: {}",
                id
            )),
            Ok(false) => {
                operator.warn(&format!("Transaction {} was rejected by the ledger.", id));
                return Ok(self.fail(
                    TransferStage::AwaitingFinality,
                    LedgerError::Rejected(id.to_string()),
                ));
            }
            Err(e @ LedgerError::Expired(_)) => {
                operator.warn(&format!(
                    "Transaction {} expired before it was confirmed. Nothing was sent; run the command again to retry.",
                    id
                ));
                return Ok(self.fail(TransferStage::AwaitingFinality, e));
            }
            Err(e) => {
                operator.warn(&format!(
                    "Could not confirm transaction {}: {}. The transfer may still go through; run `balance` before retrying.",
                    id, e
                ));
                return Ok(self.fail(TransferStage::AwaitingFinality, e));
            }
        }

        self.enter(TransferStage::Reconciling);
        let reconcile = BalanceReconciler::new(self.ledger).reconcile(store, sender, operator);

        self.enter(TransferStage::Done);
        Ok(TransferReport {
            outcome: TransferOutcome::Completed { id, fee, reconcile },
            stages: self.stages,
        })
    }

    fn enter(&mut self, stage: TransferStage) {
        log::debug!("Transfer stage: {:?}", stage);
        self.stages.push(stage);
    }

    fn abort(mut self, fee: u64, reason: AbortReason) -> TransferReport {
        self.enter(TransferStage::Aborted);
        TransferReport {
            outcome: TransferOutcome::Aborted { fee, reason },
            stages: self.stages,
        }
    }

    fn fail(mut self, stage: TransferStage, error: LedgerError) -> TransferReport {
        log::warn!("Transfer failed during {:?}: {}", stage, error);
        self.enter(TransferStage::Failed);
        TransferReport {
            outcome: TransferOutcome::Failed { stage, error },
            stages: self.stages,
        }
    }
}
