//! Storage data models
//!
//! Defines the in-memory wallet record and its on-disk JSON representation.

use serde::{Deserialize, Serialize};

use crate::storage::keys::{Address, KeyError, Keypair, SecretKeyBytes};

/// A managed wallet
///
/// Name, address and secret are fixed at creation. The cached balance is
/// only changed through [`crate::storage::WalletStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    name: String,
    address: Address,
    secret: SecretKeyBytes,
    balance: u64,
}

impl WalletRecord {
    /// Create a record for a freshly generated keypair (balance 0)
    pub fn from_keypair(name: impl Into<String>, keypair: &Keypair) -> Self {
        Self {
            name: name.into(),
            address: keypair.address(),
            secret: keypair.secret_bytes(),
            balance: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn secret(&self) -> &SecretKeyBytes {
        &self.secret
    }

    /// Cached balance in lamports
    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, lamports: u64) {
        self.balance = lamports;
    }
}

/// Wallet file document: `{"data": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletFile {
    pub data: Vec<WalletJson>,
}

/// One wallet entry in the wallet file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletJson {
    pub wallet_name: String,
    pub balance: u64,
    pub public_key: String,
    pub secret_key: Vec<u8>,
}

impl From<&WalletRecord> for WalletJson {
    fn from(record: &WalletRecord) -> Self {
        Self {
            wallet_name: record.name.clone(),
            balance: record.balance,
            public_key: record.address.to_base58(),
            secret_key: record.secret.as_bytes().to_vec(),
        }
    }
}

impl TryFrom<WalletJson> for WalletRecord {
    type Error = KeyError;

    fn try_from(json: WalletJson) -> Result<Self, Self::Error> {
        let address: Address = json.public_key.parse()?;
        let secret = SecretKeyBytes::new(json.secret_key)?;

        if secret.embedded_address() != address {
            return Err(KeyError::Corrupted(format!(
                "secret key does not belong to public key {}",
                address
            )));
        }

        Ok(Self {
            name: json.wallet_name,
            address,
            secret,
            balance: json.balance,
        })
    }
}
