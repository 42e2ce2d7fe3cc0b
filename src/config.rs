//! Configuration types for the Solana wallet manager
//!
//! Manages global configuration including cluster selection, RPC endpoint,
//! commitment level, airdrop limits, and the wallet file location.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::LAMPORTS_PER_SOL;

/// Global wallet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub network: NetworkType,
    pub rpc_url: String,
    pub commitment: Commitment,
    pub airdrop: AirdropConfig,
    pub confirmation: ConfirmationConfig,
    /// Optional custom wallet file path
    pub wallets_file: Option<String>,
}

/// Airdrop limits, in lamports
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirdropConfig {
    /// Amount requested when the operator gives none
    pub default_lamports: u64,
    /// Ceiling applied to every faucet request
    pub max_lamports: u64,
}

/// Confirmation polling used by the RPC client
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfirmationConfig {
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
}

/// Solana cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Localnet,
    Devnet,
    Testnet,
    Mainnet,
}

/// Commitment level a transaction must reach before it counts as final
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl NetworkType {
    /// Default public RPC endpoint for the cluster
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            NetworkType::Localnet => "http://127.0.0.1:8899",
            NetworkType::Devnet => "https://api.devnet.solana.com",
            NetworkType::Testnet => "https://api.testnet.solana.com",
            NetworkType::Mainnet => "https://api.mainnet-beta.solana.com",
        }
    }
}

impl std::str::FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "localnet" | "localhost" => Ok(NetworkType::Localnet),
            "devnet" => Ok(NetworkType::Devnet),
            "testnet" => Ok(NetworkType::Testnet),
            "mainnet" | "mainnet-beta" => Ok(NetworkType::Mainnet),
            _ => Err(ConfigError::InvalidNetwork(s.to_string())),
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkType::Localnet => write!(f, "localnet"),
            NetworkType::Devnet => write!(f, "devnet"),
            NetworkType::Testnet => write!(f, "testnet"),
            NetworkType::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl Commitment {
    /// Name used in RPC `commitment` parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl std::str::FromStr for Commitment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            _ => Err(ConfigError::Invalid(format!("unknown commitment level '{}'", s))),
        }
    }
}

impl GlobalConfig {
    /// Create default configuration for a cluster
    pub fn for_network(network: NetworkType) -> Self {
        Self {
            network,
            rpc_url: network.default_rpc_url().to_string(),
            commitment: Commitment::Confirmed,
            airdrop: AirdropConfig {
                default_lamports: LAMPORTS_PER_SOL,
                max_lamports: 5 * LAMPORTS_PER_SOL,
            },
            confirmation: ConfirmationConfig {
                poll_interval_ms: 500,
                timeout_secs: 90,
            },
            wallets_file: None,
        }
    }

    /// Create default configuration for testnet
    pub fn default_testnet() -> Self {
        Self::for_network(NetworkType::Testnet)
    }

    /// Resolve the wallet file path (custom or default)
    pub fn wallets_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.wallets_file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(default_config_dir()?.join("wallets.json")),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::default_testnet()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid network: {0}. Use: localnet, devnet, testnet, or mainnet")]
    InvalidNetwork(String),

    #[error("Config directory not found")]
    DirectoryNotFound,
}

/// Configuration overrides from CLI arguments or environment variables
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub network: Option<NetworkType>,
    pub rpc_url: Option<String>,
    pub commitment: Option<Commitment>,
    pub wallets_file: Option<String>,
}

impl ConfigOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create overrides from environment variables
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self {
            network: std::env::var("SOLANA_NETWORK")
                .ok()
                .and_then(|s| s.parse().ok()),
            rpc_url: std::env::var("SOLANA_RPC_URL").ok(),
            commitment: std::env::var("SOLANA_COMMITMENT")
                .ok()
                .and_then(|s| s.parse().ok()),
            wallets_file: std::env::var("WALLETS_FILE").ok(),
        }
    }

    /// Merge with another set of overrides (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.network.is_some() {
            self.network = other.network;
        }
        if other.rpc_url.is_some() {
            self.rpc_url = other.rpc_url;
        }
        if other.commitment.is_some() {
            self.commitment = other.commitment;
        }
        if other.wallets_file.is_some() {
            self.wallets_file = other.wallets_file;
        }
        self
    }
}

/// Get the default configuration directory path
///
/// Returns: `~/.solana-wallet-manager/`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".solana-wallet-manager"))
        .ok_or(ConfigError::DirectoryNotFound)
}

/// Get the default configuration file path
///
/// Returns: `~/.solana-wallet-manager/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join("config.json"))
}

/// Load configuration from file with overrides
///
/// # Priority (highest to lowest):
/// 1. CLI overrides (passed as argument)
/// 2. Environment variables
/// 3. Config file
/// 4. Network defaults
pub fn load_config(
    config_path: Option<&Path>,
    cli_overrides: ConfigOverrides,
) -> Result<GlobalConfig, ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let overrides = ConfigOverrides::from_env().merge(cli_overrides);

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)?
    } else {
        GlobalConfig::for_network(overrides.network.unwrap_or(NetworkType::Testnet))
    };

    apply_overrides(&mut config, overrides);
    validate(&config)?;

    log::debug!(
        "Loaded config: network={}, rpc={}, commitment={}",
        config.network,
        config.rpc_url,
        config.commitment.as_str()
    );

    Ok(config)
}

/// Save configuration to file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &GlobalConfig, config_path: Option<&Path>) -> Result<(), ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;

    Ok(())
}

/// Apply configuration overrides (internal helper)
fn apply_overrides(config: &mut GlobalConfig, overrides: ConfigOverrides) {
    // Switching cluster also switches the endpoint unless one is given explicitly
    if let Some(network) = overrides.network {
        if config.network != network {
            config.network = network;
            if overrides.rpc_url.is_none() {
                config.rpc_url = network.default_rpc_url().to_string();
            }
        }
    }

    if let Some(url) = overrides.rpc_url {
        config.rpc_url = url;
    }
    if let Some(commitment) = overrides.commitment {
        config.commitment = commitment;
    }
    if let Some(wallets_file) = overrides.wallets_file {
        config.wallets_file = Some(wallets_file);
    }
}

fn validate(config: &GlobalConfig) -> Result<(), ConfigError> {
    if config.airdrop.max_lamports == 0 {
        return Err(ConfigError::Invalid(
            "airdrop.max_lamports must be greater than zero".to_string(),
        ));
    }
    if config.confirmation.poll_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "confirmation.poll_interval_ms must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
