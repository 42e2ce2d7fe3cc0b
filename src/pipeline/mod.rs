//! Network operations on a selected wallet
//!
//! Transfers and airdrops, each ending in a balance reconciliation.

pub mod airdrop;
pub mod reconcile;
pub mod transfer;

pub use airdrop::{AirdropError, AirdropPipeline, AirdropReport};
pub use reconcile::{BalanceReconciler, ReconcileOutcome};
pub use transfer::{
    interpret_confirmation, AbortReason, ConfirmationDecision, TransferError, TransferOutcome,
    TransferPipeline, TransferReport, TransferRequest, TransferStage,
};
