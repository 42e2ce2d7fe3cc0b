//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "solana-wallet-manager",
    version,
    about = "Solana Wallet Manager - manage local wallets, request airdrops and send SOL",
    long_about = None
)]
pub struct Cli {
    /// Wallet name to use instead of choosing interactively
    #[arg(short, long, global = true)]
    pub wallet: Option<String>,

    /// Cluster to use: localnet, devnet, testnet, mainnet (overrides config)
    #[arg(short, long, global = true)]
    pub network: Option<String>,

    /// RPC endpoint URL (overrides config)
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Commitment level: processed, confirmed, finalized (overrides config)
    #[arg(long, global = true)]
    pub commitment: Option<String>,

    /// Path of the wallet file (overrides config)
    #[arg(long, global = true)]
    pub wallets_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or manage wallets
    New {
        /// Generate a new keypair and store it under this name
        #[arg(short, long, value_name = "WALLET_NAME")]
        create: Option<String>,
    },

    /// Request an airdrop to a managed wallet
    Airdrop {
        /// Amount in SOL (defaults to the configured airdrop amount)
        amount: Option<String>,
    },

    /// Check and update wallet funds
    Balance,

    /// Send SOL to an address
    Transfer {
        /// Recipient address (base58)
        address: String,

        /// Amount in SOL
        amount: String,
    },

    /// List managed wallets with their recorded balances
    List,

    /// Initialize or manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize configuration file with defaults
    Init {
        /// Cluster to initialize for (defaults to testnet)
        #[arg(short, long)]
        network: Option<String>,
    },
}
