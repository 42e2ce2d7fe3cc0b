//! Wallet manager - Main integration layer
//!
//! Coordinates between config, the wallet store, the ledger client and the
//! transfer/airdrop pipelines. One manager is built per CLI invocation and
//! owns the store for the whole run.

use crate::config::{ConfigError, GlobalConfig};
use crate::ledger::{LedgerClient, LedgerError, RpcLedgerClient};
use crate::operator::Operator;
use crate::pipeline::{
    AirdropError, AirdropPipeline, AirdropReport, BalanceReconciler, ReconcileOutcome,
    TransferError, TransferPipeline, TransferReport, TransferRequest,
};
use crate::storage::{Address, Keypair, SelectionCriterion, StoreError, WalletStore};

/// Errors that can occur in the wallet manager
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wallet store error: {0}")]
    Store(#[from] StoreError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Airdrop error: {0}")]
    Airdrop(#[from] AirdropError),
}

/// Main wallet manager
pub struct WalletManager<L: LedgerClient = RpcLedgerClient> {
    config: GlobalConfig,
    store: WalletStore,
    ledger: L,
}

impl WalletManager<RpcLedgerClient> {
    /// Load the wallet file and connect to the configured RPC endpoint
    ///
    /// Fails with [`StoreError::Corrupt`] if the wallet file cannot be read;
    /// the file is left as it is.
    pub fn new(config: GlobalConfig) -> Result<Self, ManagerError> {
        let store = WalletStore::load(config.wallets_path()?)?;
        let ledger = RpcLedgerClient::from_config(&config)?;
        log::debug!("Using RPC endpoint {}", ledger.url());
        Ok(Self::with_ledger(config, store, ledger))
    }
}

impl<L: LedgerClient> WalletManager<L> {
    /// Assemble a manager from an already loaded store and any ledger client
    pub fn with_ledger(config: GlobalConfig, store: WalletStore, ledger: L) -> Self {
        Self {
            config,
            store,
            ledger,
        }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Generate a keypair and register it as `name`
    ///
    /// Returns only after the wallet file has been written.
    pub fn create_wallet(&mut self, name: &str) -> Result<Address, ManagerError> {
        if self.store.contains(name.trim()) {
            return Err(StoreError::DuplicateName(name.trim().to_string()).into());
        }
        let keypair = Keypair::generate();
        let record = self.store.create(name, &keypair)?;
        Ok(record.address())
    }

    /// Pick a wallet; `None` if nothing was selected
    pub fn select_wallet(
        &self,
        criterion: &SelectionCriterion,
        operator: &mut dyn Operator,
    ) -> Option<String> {
        self.store
            .select(criterion, operator)
            .map(|record| record.name().to_string())
    }

    /// Reconcile the cached balance of `name` with the ledger
    pub fn refresh_balance(&mut self, name: &str, operator: &mut dyn Operator) -> ReconcileOutcome {
        BalanceReconciler::new(&self.ledger).reconcile(&mut self.store, name, operator)
    }

    /// Request an airdrop for `name`
    ///
    /// `lamports` defaults to the configured airdrop amount.
    pub fn airdrop(
        &mut self,
        name: &str,
        lamports: Option<u64>,
        operator: &mut dyn Operator,
    ) -> Result<AirdropReport, ManagerError> {
        let lamports = lamports.unwrap_or(self.config.airdrop.default_lamports);
        let pipeline = AirdropPipeline::new(&self.ledger, self.config.airdrop.max_lamports);
        Ok(pipeline.run(&mut self.store, name, lamports, operator)?)
    }

    /// Transfer lamports from `name`
    pub fn transfer(
        &mut self,
        name: &str,
        request: &TransferRequest,
        operator: &mut dyn Operator,
    ) -> Result<TransferReport, ManagerError> {
        let pipeline = TransferPipeline::new(&self.ledger);
        Ok(pipeline.run(&mut self.store, name, request, operator)?)
    }
}
