//! Ledger network boundary
//!
//! The wallet talks to the Solana cluster only through [`LedgerClient`].
//! [`RpcLedgerClient`] implements it over JSON-RPC; tests substitute a
//! scripted implementation.

pub mod rpc;
pub mod transaction;

use std::fmt;

use crate::storage::keys::Address;

pub use rpc::RpcLedgerClient;
pub use transaction::{
    validate_recipient, SignedTransaction, TransferInstruction, UnsignedTransaction,
};

/// Errors talking to the ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    #[error("Transaction {0} was rejected by the ledger")]
    Rejected(String),

    #[error("Timed out waiting for confirmation of {0}")]
    Timeout(String),

    #[error("Transaction {0} expired before it was confirmed")]
    Expired(String),
}

/// Recent blockhash a transaction is anchored to
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    blockhash: [u8; 32],
    last_valid_block_height: u64,
}

impl Checkpoint {
    pub fn new(blockhash: [u8; 32], last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }

    pub fn blockhash(&self) -> &[u8; 32] {
        &self.blockhash
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }
}

impl fmt::Debug for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoint")
            .field("blockhash", &bs58::encode(self.blockhash).into_string())
            .field("last_valid_block_height", &self.last_valid_block_height)
            .finish()
    }
}

/// Transaction signature as returned by the cluster (base58)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations the wallet needs from the ledger
///
/// Every call blocks until the ledger answers.
pub trait LedgerClient {
    /// Authoritative balance in lamports
    fn get_balance(&self, address: &Address) -> Result<u64, LedgerError>;

    /// Ask the faucet to fund `address`
    fn request_faucet(&self, address: &Address, lamports: u64)
        -> Result<TransactionId, LedgerError>;

    /// Wait for `id` to reach the configured commitment
    ///
    /// `Ok(false)` means the ledger reported the transaction as failed.
    /// With `valid_until` set, waiting stops with [`LedgerError::Expired`]
    /// once the chain passes that block height without having seen `id`;
    /// otherwise the client's own timeout applies.
    fn confirm_transaction(
        &self,
        id: &TransactionId,
        valid_until: Option<u64>,
    ) -> Result<bool, LedgerError>;

    /// Fee in lamports the ledger would charge for `transaction`
    fn estimate_fee(&self, transaction: &UnsignedTransaction) -> Result<u64, LedgerError>;

    fn submit_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<TransactionId, LedgerError>;

    fn latest_checkpoint(&self) -> Result<Checkpoint, LedgerError>;
}
