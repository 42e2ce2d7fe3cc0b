//! JSON-RPC ledger client
//!
//! Blocking client for the Solana JSON-RPC API. Only the methods the wallet
//! needs are wrapped.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::config::{Commitment, GlobalConfig};
use crate::ledger::{
    Checkpoint, LedgerClient, LedgerError, SignedTransaction, TransactionId, UnsignedTransaction,
};
use crate::storage::keys::Address;

/// Timeout for a single HTTP request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// `{ "context": {...}, "value": T }` wrapper used by most methods
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<String>,
}

/// Where a submitted transaction stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finality {
    /// Reached the target commitment (`true`) or failed on-chain (`false`)
    Settled(bool),
    /// Known to the cluster but not yet at the target commitment
    Landed,
    /// Not known to the cluster
    Unseen,
}

fn finality(status: Option<SignatureStatus>, commitment: Commitment) -> Finality {
    let Some(status) = status else {
        return Finality::Unseen;
    };
    if status.err.is_some() {
        return Finality::Settled(false);
    }
    let reached = status
        .confirmation_status
        .as_deref()
        .and_then(|s| s.parse::<Commitment>().ok())
        .map_or(false, |level| level >= commitment);
    if reached {
        Finality::Settled(true)
    } else {
        Finality::Landed
    }
}

/// Ledger client speaking Solana JSON-RPC over HTTP
pub struct RpcLedgerClient {
    http: Client,
    url: String,
    commitment: Commitment,
    poll_interval: Duration,
    confirm_timeout: Duration,
    next_id: Cell<u64>,
}

impl RpcLedgerClient {
    /// Create a client for `url` that confirms at `commitment`
    pub fn new(url: &str, commitment: Commitment) -> Result<Self, LedgerError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            commitment,
            poll_interval: Duration::from_millis(500),
            confirm_timeout: Duration::from_secs(90),
            next_id: Cell::new(1),
        })
    }

    /// Create a client from the wallet configuration
    pub fn from_config(config: &GlobalConfig) -> Result<Self, LedgerError> {
        let mut client = Self::new(&config.rpc_url, config.commitment)?;
        client.poll_interval = Duration::from_millis(config.confirmation.poll_interval_ms);
        client.confirm_timeout = Duration::from_secs(config.confirmation.timeout_secs);
        Ok(client)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        log::debug!("RPC {} -> {}", method, self.url);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let response: JsonRpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        if let Some(error) = response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| LedgerError::InvalidResponse(format!("{} returned no result", method)))
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    fn signature_status(&self, id: &TransactionId) -> Result<Option<SignatureStatus>, LedgerError> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self.call(
            "getSignatureStatuses",
            json!([[id.as_str()], { "searchTransactionHistory": false }]),
        )?;
        Ok(statuses.value.into_iter().next().flatten())
    }

    fn block_height(&self) -> Result<u64, LedgerError> {
        self.call("getBlockHeight", json!([self.commitment_config()]))
    }
}

impl LedgerClient for RpcLedgerClient {
    fn get_balance(&self, address: &Address) -> Result<u64, LedgerError> {
        let balance: WithContext<u64> = self.call(
            "getBalance",
            json!([address.to_base58(), self.commitment_config()]),
        )?;
        Ok(balance.value)
    }

    fn request_faucet(
        &self,
        address: &Address,
        lamports: u64,
    ) -> Result<TransactionId, LedgerError> {
        let signature: String = self.call(
            "requestAirdrop",
            json!([address.to_base58(), lamports, self.commitment_config()]),
        )?;
        Ok(TransactionId::new(signature))
    }

    fn confirm_transaction(
        &self,
        id: &TransactionId,
        valid_until: Option<u64>,
    ) -> Result<bool, LedgerError> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            match finality(self.signature_status(id)?, self.commitment) {
                Finality::Settled(ok) => {
                    if ok {
                        log::debug!("Transaction {} reached {}", id, self.commitment.as_str());
                    } else {
                        log::warn!("Transaction {} failed on-chain", id);
                    }
                    return Ok(ok);
                }
                // Landed below the target commitment; only the timeout applies
                Finality::Landed => {
                    if Instant::now() >= deadline {
                        return Err(LedgerError::Timeout(id.to_string()));
                    }
                }
                Finality::Unseen => match valid_until {
                    Some(last_valid) => {
                        let height = self.block_height()?;
                        if height > last_valid {
                            if let Finality::Settled(ok) =
                                finality(self.signature_status(id)?, self.commitment)
                            {
                                return Ok(ok);
                            }
                            log::warn!(
                                "Transaction {} not seen by block height {} (valid until {})",
                                id,
                                height,
                                last_valid
                            );
                            return Err(LedgerError::Expired(id.to_string()));
                        }
                    }
                    None => {
                        if Instant::now() >= deadline {
                            return Err(LedgerError::Timeout(id.to_string()));
                        }
                    }
                },
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    fn estimate_fee(&self, transaction: &UnsignedTransaction) -> Result<u64, LedgerError> {
        let fee: WithContext<Option<u64>> = self.call(
            "getFeeForMessage",
            json!([BASE64.encode(transaction.message_bytes()), self.commitment_config()]),
        )?;
        fee.value.ok_or_else(|| {
            LedgerError::InvalidResponse("fee unavailable, the blockhash may have expired".to_string())
        })
    }

    fn submit_transaction(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<TransactionId, LedgerError> {
        let signature: String = self.call(
            "sendTransaction",
            json!([
                BASE64.encode(transaction.to_wire_bytes()),
                { "encoding": "base64", "preflightCommitment": self.commitment.as_str() }
            ]),
        )?;
        Ok(TransactionId::new(signature))
    }

    fn latest_checkpoint(&self) -> Result<Checkpoint, LedgerError> {
        let latest: WithContext<LatestBlockhash> = self.call(
            "getLatestBlockhash",
            json!([{ "commitment": Commitment::Finalized.as_str() }]),
        )?;
        let bytes = bs58::decode(&latest.value.blockhash)
            .into_vec()
            .map_err(|e| LedgerError::InvalidResponse(format!("blockhash: {}", e)))?;
        let blockhash: [u8; 32] = bytes.try_into().map_err(|_| {
            LedgerError::InvalidResponse("blockhash is not 32 bytes".to_string())
        })?;
        Ok(Checkpoint::new(blockhash, latest.value.last_valid_block_height))
    }
}

impl std::fmt::Debug for RpcLedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcLedgerClient")
            .field("url", &self.url)
            .field("commitment", &self.commitment)
            .finish()
    }
}
