//! Wallet file persistence
//!
//! [`WalletStore`] owns every managed wallet for the lifetime of a command.
//! It is loaded once, mutated only through its own methods, and written back
//! to disk after each mutation with an atomic temp-file-then-rename.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::operator::Operator;
use crate::storage::keys::{KeyError, Keypair};
use crate::storage::models::{WalletFile, WalletJson, WalletRecord};

/// Wallet store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error(
        "Wallet file {} is corrupt: {reason}. The file was not modified; repair it or move it aside.",
        path.display()
    )]
    Corrupt { path: PathBuf, reason: String },

    #[error("Duplicate wallet names are not allowed: '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid wallet name: {0}")]
    InvalidName(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),
}

/// How a command picks the wallet it operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionCriterion {
    /// List the wallets and ask the operator for an order number
    Interactive,

    /// Use the wallet with this exact name
    ByName(String),
}

/// All managed wallets, backed by a JSON file
#[derive(Debug)]
pub struct WalletStore {
    path: PathBuf,
    records: Vec<WalletRecord>,
    revision: u64,
}

impl WalletStore {
    /// Load the wallet file at `path`
    ///
    /// A missing file is created empty straight away. A file that exists but
    /// cannot be parsed, or that breaks a store invariant, yields
    /// [`StoreError::Corrupt`] and is left untouched on disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            let mut store = Self {
                path,
                records: Vec::new(),
                revision: 0,
            };
            store.persist()?;
            log::info!("Created empty wallet file at {}", store.path.display());
            return Ok(store);
        }

        let contents = fs::read(&path)?;
        let file: WalletFile = serde_json::from_slice(&contents).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let mut records: Vec<WalletRecord> = Vec::with_capacity(file.data.len());
        for (index, entry) in file.data.into_iter().enumerate() {
            let name = entry.wallet_name.clone();
            if records.iter().any(|r| r.name() == name) {
                return Err(StoreError::Corrupt {
                    path,
                    reason: format!("wallet name '{}' appears more than once", name),
                });
            }
            let record = WalletRecord::try_from(entry).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: format!("entry {} ('{}'): {}", index + 1, name, e),
            })?;
            records.push(record);
        }

        log::debug!("Loaded {} wallet(s) from {}", records.len(), path.display());

        Ok(Self {
            path,
            records,
            revision: 0,
        })
    }

    /// Path of the backing wallet file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wallets in insertion order
    pub fn records(&self) -> &[WalletRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&WalletRecord> {
        self.records.iter().find(|r| r.name() == name)
    }

    /// Number of successful writes made by this store instance
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a new wallet for `keypair` under `name`
    ///
    /// The wallet is only kept if the file write succeeds; on a write error
    /// the in-memory insertion is undone and the error returned.
    pub fn create(&mut self, name: &str, keypair: &Keypair) -> Result<&WalletRecord, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidName("name must not be empty".to_string()));
        }
        if self.contains(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        self.records.push(WalletRecord::from_keypair(name, keypair));
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        log::info!("Created wallet '{}' ({})", name, keypair.address());
        Ok(&self.records[self.records.len() - 1])
    }

    /// Update the cached balance of `name` and write the store
    ///
    /// The in-memory value is kept even if the write fails.
    pub fn set_balance(&mut self, name: &str, lamports: u64) -> Result<(), StoreError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.name() == name)
            .ok_or_else(|| StoreError::WalletNotFound(name.to_string()))?;
        record.set_balance(lamports);
        self.persist()
    }

    /// Write every wallet to disk, replacing the file atomically
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let file = WalletFile {
            data: self.records.iter().map(WalletJson::from).collect(),
        };

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut serializer =
                Serializer::with_formatter(&mut tmp, PrettyFormatter::with_indent(b"    "));
            file.serialize(&mut serializer)?;
        }
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        self.revision += 1;
        log::debug!(
            "Wrote {} wallet(s) to {} (revision {})",
            self.records.len(),
            self.path.display(),
            self.revision
        );
        Ok(())
    }

    /// Resolve one wallet according to `criterion`
    ///
    /// Returns `None` when there is nothing to pick or the operator's answer
    /// does not identify a wallet. The reason is reported to the operator.
    pub fn select(
        &self,
        criterion: &SelectionCriterion,
        operator: &mut dyn Operator,
    ) -> Option<&WalletRecord> {
        if self.records.is_empty() {
            operator.notify(
                "No existing wallets detected. If you want to create one, check command \"new --help\".",
            );
            return None;
        }

        let selected = match criterion {
            SelectionCriterion::ByName(name) => match self.get(name.trim()) {
                Some(record) => record,
                None => {
                    operator.warn(&format!("No wallet named '{}' was found.", name));
                    return None;
                }
            },
            SelectionCriterion::Interactive => {
                operator.notify("Detected existing wallets:");
                for (index, record) in self.records.iter().enumerate() {
                    operator.notify(&format!(
                        "[{}] - Wallet Name: {}, Public Key: {}",
                        index + 1,
                        record.name(),
                        record.address()
                    ));
                }

                let answer = match operator
                    .ask("Please enter the order number of the wallet you want to interact with: ")
                {
                    Ok(answer) => answer,
                    Err(e) => {
                        operator.warn(&format!("No wallet selected: {}", e));
                        return None;
                    }
                };

                match answer
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| self.records.get(i))
                {
                    Some(record) => record,
                    None => {
                        operator.warn("Invalid order number. Please try again.");
                        return None;
                    }
                }
            }
        };

        operator.notify(&format!(
            "You selected: Wallet Name: {}, Public Key: {}",
            selected.name(),
            selected.address()
        ));
        Some(selected)
    }
}
