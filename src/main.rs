//! Solana Wallet Manager CLI
//!
//! Command-line interface for managing local Solana wallets

use clap::Parser;
use solana_wallet_manager::cli::args::{Cli, Commands, ConfigAction};
use solana_wallet_manager::cli::commands;
use solana_wallet_manager::config::{Commitment, ConfigOverrides, NetworkType};
use std::process;

fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let network = cli.network.as_ref().map(|n| match n.parse::<NetworkType>() {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    });

    let commitment = cli.commitment.as_ref().map(|c| match c.parse::<Commitment>() {
        Ok(commitment) => commitment,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    });

    // Build config overrides from global arguments
    let overrides = ConfigOverrides {
        network,
        rpc_url: cli.rpc_url.clone(),
        commitment,
        wallets_file: cli.wallets_file.clone(),
    };

    let Some(command) = cli.command else {
        println!("Welcome to the Solana Wallet Manager!");
        println!("Run with --help to see the available commands.");
        return;
    };

    let result: Result<(), Box<dyn std::error::Error>> = match command {
        Commands::Config { action } => match action {
            ConfigAction::Init { network } => commands::config::init(network).map_err(Into::into),
        },

        Commands::New { create } => commands::wallet::create(create, overrides).map_err(Into::into),

        Commands::List => commands::wallet::list(overrides).map_err(Into::into),

        Commands::Balance => commands::balance::balance(cli.wallet, overrides).map_err(Into::into),

        Commands::Airdrop { amount } => {
            commands::balance::airdrop(cli.wallet, amount, overrides).map_err(Into::into)
        }

        Commands::Transfer { address, amount } => {
            commands::transfer::send(cli.wallet, address, amount, overrides).map_err(Into::into)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
