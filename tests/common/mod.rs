//! Common test utilities for solana-wallet-manager integration tests
//!
//! This module provides shared test infrastructure including:
//! - Temporary wallet file environment with automatic cleanup
//! - A scripted in-memory ledger standing in for the RPC client
//! - An operator that writes into the same event journal as the ledger

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use solana_wallet_manager::config::GlobalConfig;
use solana_wallet_manager::ledger::{
    Checkpoint, LedgerClient, LedgerError, SignedTransaction, TransactionId, UnsignedTransaction,
};
use solana_wallet_manager::operator::{Operator, OperatorError, ScriptedOperator};
use solana_wallet_manager::storage::{Address, WalletStore};
use tempfile::TempDir;

/// Shared, ordered log of ledger calls and operator messages
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Test environment with automatic cleanup
pub struct TestWalletsEnv {
    _temp_dir: TempDir,
    pub wallets_file: PathBuf,
}

impl TestWalletsEnv {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let wallets_file = temp_dir.path().join("wallets.json");

        Self {
            _temp_dir: temp_dir,
            wallets_file,
        }
    }

    pub fn open_store(&self) -> WalletStore {
        WalletStore::load(&self.wallets_file).expect("Failed to load wallet store")
    }

    pub fn read_file(&self) -> String {
        std::fs::read_to_string(&self.wallets_file).expect("Failed to read wallet file")
    }

    pub fn write_file(&self, contents: &str) {
        std::fs::write(&self.wallets_file, contents).expect("Failed to write wallet file");
    }

    /// Testnet config pointing at this environment's wallet file
    pub fn config(&self) -> GlobalConfig {
        let mut config = GlobalConfig::default_testnet();
        config.wallets_file = Some(self.wallets_file.to_string_lossy().to_string());
        config
    }
}

/// How [`MockLedger::confirm_transaction`] answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmScript {
    Confirmed,
    Rejected,
    TimedOut,
    Expired,
}

/// A transfer the mock has accepted but not yet applied
#[derive(Debug, Clone)]
struct PendingTransfer {
    id: TransactionId,
    from: Address,
    to: Address,
    lamports: u64,
}

/// In-memory ledger
///
/// Balances move only when a transaction is confirmed. Every call is written
/// to the journal.
pub struct MockLedger {
    balances: RefCell<HashMap<Address, u64>>,
    fee: Cell<u64>,
    confirm: Cell<ConfirmScript>,
    balance_unavailable: Cell<bool>,
    quote_unavailable: Cell<bool>,
    faucet_unavailable: Cell<bool>,
    submit_unavailable: Cell<bool>,
    pending: RefCell<Vec<PendingTransfer>>,
    faucet_requests: RefCell<Vec<u64>>,
    submitted: RefCell<Vec<SignedTransaction>>,
    next_signature: Cell<u64>,
    journal: Journal,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::with_journal(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            balances: RefCell::new(HashMap::new()),
            fee: Cell::new(5_000),
            confirm: Cell::new(ConfirmScript::Confirmed),
            balance_unavailable: Cell::new(false),
            quote_unavailable: Cell::new(false),
            faucet_unavailable: Cell::new(false),
            submit_unavailable: Cell::new(false),
            pending: RefCell::new(Vec::new()),
            faucet_requests: RefCell::new(Vec::new()),
            submitted: RefCell::new(Vec::new()),
            next_signature: Cell::new(1),
            journal,
        }
    }

    pub fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    pub fn journal_entries(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    pub fn set_balance(&self, address: Address, lamports: u64) {
        self.balances.borrow_mut().insert(address, lamports);
    }

    pub fn balance_of(&self, address: &Address) -> u64 {
        self.balances.borrow().get(address).copied().unwrap_or(0)
    }

    pub fn set_fee(&self, lamports: u64) {
        self.fee.set(lamports);
    }

    pub fn set_confirm(&self, script: ConfirmScript) {
        self.confirm.set(script);
    }

    pub fn set_balance_unavailable(&self, unavailable: bool) {
        self.balance_unavailable.set(unavailable);
    }

    pub fn set_quote_unavailable(&self, unavailable: bool) {
        self.quote_unavailable.set(unavailable);
    }

    pub fn set_faucet_unavailable(&self, unavailable: bool) {
        self.faucet_unavailable.set(unavailable);
    }

    pub fn set_submit_unavailable(&self, unavailable: bool) {
        self.submit_unavailable.set(unavailable);
    }

    pub fn faucet_requests(&self) -> Vec<u64> {
        self.faucet_requests.borrow().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.borrow().len()
    }

    /// Wire bytes of every submitted transaction
    pub fn submitted_wire(&self) -> Vec<Vec<u8>> {
        self.submitted
            .borrow()
            .iter()
            .map(SignedTransaction::to_wire_bytes)
            .collect()
    }

    fn log(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }

    fn next_id(&self) -> TransactionId {
        let n = self.next_signature.get();
        self.next_signature.set(n + 1);
        TransactionId::new(format!("mock-signature-{}", n))
    }

    fn unavailable(what: &str) -> LedgerError {
        LedgerError::Unavailable(format!("{} is down", what))
    }
}

impl LedgerClient for MockLedger {
    fn get_balance(&self, address: &Address) -> Result<u64, LedgerError> {
        self.log(format!("ledger:get_balance {}", address));
        if self.balance_unavailable.get() {
            return Err(Self::unavailable("balance service"));
        }
        Ok(self.balance_of(address))
    }

    fn request_faucet(
        &self,
        address: &Address,
        lamports: u64,
    ) -> Result<TransactionId, LedgerError> {
        self.log(format!("ledger:request_faucet {}", lamports));
        self.faucet_requests.borrow_mut().push(lamports);
        if self.faucet_unavailable.get() {
            return Err(Self::unavailable("faucet"));
        }
        let id = self.next_id();
        self.pending.borrow_mut().push(PendingTransfer {
            id: id.clone(),
            from: Address::from_bytes([0u8; 32]),
            to: *address,
            lamports,
        });
        Ok(id)
    }

    fn confirm_transaction(
        &self,
        id: &TransactionId,
        valid_until: Option<u64>,
    ) -> Result<bool, LedgerError> {
        self.log(format!("ledger:confirm_transaction {} {:?}", id, valid_until));
        let pending = {
            let mut pending = self.pending.borrow_mut();
            let position = pending.iter().position(|p| &p.id == id);
            position.map(|i| pending.remove(i))
        };
        match self.confirm.get() {
            ConfirmScript::Confirmed => {
                if let Some(p) = pending {
                    let faucet = p.from == Address::from_bytes([0u8; 32]);
                    let mut balances = self.balances.borrow_mut();
                    if !faucet {
                        let fee = self.fee.get();
                        let sender = balances.entry(p.from).or_insert(0);
                        *sender = sender.saturating_sub(p.lamports + fee);
                    }
                    *balances.entry(p.to).or_insert(0) += p.lamports;
                }
                Ok(true)
            }
            ConfirmScript::Rejected => Ok(false),
            ConfirmScript::TimedOut => Err(LedgerError::Timeout(id.to_string())),
            ConfirmScript::Expired => Err(LedgerError::Expired(id.to_string())),
        }
    }

    fn estimate_fee(&self, _transaction: &UnsignedTransaction) -> Result<u64, LedgerError> {
        self.log("ledger:estimate_fee".to_string());
        if self.quote_unavailable.get() {
            return Err(Self::unavailable("fee service"));
        }
        Ok(self.fee.get())
    }

    fn submit_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<TransactionId, LedgerError> {
        self.log("ledger:submit_transaction".to_string());
        if self.submit_unavailable.get() {
            return Err(Self::unavailable("submission endpoint"));
        }

        // Header (3 bytes) and key count (1 byte) precede the account keys
        let message = transaction.message_bytes();
        let key = |index: usize| {
            let start = 4 + index * 32;
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&message[start..start + 32]);
            Address::from_bytes(bytes)
        };
        let from = key(0);
        let to = if message[3] >= 3 { key(1) } else { from };
        let data_end = message.len();
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&message[data_end - 8..]);

        self.submitted.borrow_mut().push(transaction.clone());
        let id = transaction.id();
        self.pending.borrow_mut().push(PendingTransfer {
            id: id.clone(),
            from,
            to,
            lamports: u64::from_le_bytes(amount),
        });
        Ok(id)
    }

    fn latest_checkpoint(&self) -> Result<Checkpoint, LedgerError> {
        self.log("ledger:latest_checkpoint".to_string());
        if self.quote_unavailable.get() {
            return Err(Self::unavailable("blockhash service"));
        }
        Ok(Checkpoint::new([7u8; 32], 1_000))
    }
}

/// Scripted operator that also writes its messages into a [`Journal`]
pub struct JournalOperator {
    inner: ScriptedOperator,
    journal: Journal,
}

impl JournalOperator {
    pub fn new(inner: ScriptedOperator, journal: Journal) -> Self {
        Self { inner, journal }
    }

    pub fn inner(&self) -> &ScriptedOperator {
        &self.inner
    }
}

impl Operator for JournalOperator {
    fn ask(&mut self, question: &str) -> Result<String, OperatorError> {
        self.journal.borrow_mut().push(format!("operator:ask {}", question));
        self.inner.ask(question)
    }

    fn notify(&mut self, message: &str) {
        self.journal.borrow_mut().push(format!("operator:notify {}", message));
        self.inner.notify(message);
    }

    fn warn(&mut self, message: &str) {
        self.journal.borrow_mut().push(format!("operator:warn {}", message));
        self.inner.warn(message);
    }
}
