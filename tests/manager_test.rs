//! Integration tests for the wallet manager
//!
//! Drives `WalletManager` end to end with the in-memory ledger, the way the
//! CLI commands do.

mod common;

use common::{MockLedger, TestWalletsEnv};
use solana_wallet_manager::manager::{ManagerError, WalletManager};
use solana_wallet_manager::operator::ScriptedOperator;
use solana_wallet_manager::pipeline::{ReconcileOutcome, TransferRequest};
use solana_wallet_manager::storage::{Keypair, SelectionCriterion, StoreError};
use solana_wallet_manager::types::LAMPORTS_PER_SOL;

fn manager(env: &TestWalletsEnv) -> WalletManager<MockLedger> {
    WalletManager::with_ledger(env.config(), env.open_store(), MockLedger::new())
}

#[test]
fn test_wallets_path_follows_config() {
    let env = TestWalletsEnv::new();
    let config = env.config();

    assert_eq!(
        config.wallets_path().expect("Path should resolve"),
        env.wallets_file
    );
}

#[test]
fn test_create_wallet_then_duplicate() {
    let env = TestWalletsEnv::new();
    let mut manager = manager(&env);

    let address = manager.create_wallet("alice").expect("Failed to create wallet");
    assert_eq!(manager.store().get("alice").map(|r| r.address()), Some(address));

    let duplicate = manager.create_wallet("alice");
    assert!(matches!(
        duplicate,
        Err(ManagerError::Store(StoreError::DuplicateName(_)))
    ));
    assert_eq!(env.open_store().len(), 1);
}

#[test]
fn test_example_session() {
    let env = TestWalletsEnv::new();
    let mut manager = manager(&env);
    let mut operator = ScriptedOperator::new(["1", "1", "1", ""]);

    // new --create alice
    let alice = manager.create_wallet("alice").expect("Failed to create wallet");

    // airdrop (no amount: configured default of 1 SOL)
    let name = manager
        .select_wallet(&SelectionCriterion::Interactive, &mut operator)
        .expect("alice should be selected");
    let report = manager
        .airdrop(&name, None, &mut operator)
        .expect("Airdrop should run");
    assert_eq!(report.granted, LAMPORTS_PER_SOL);
    assert!(report.confirmed);
    assert_eq!(manager.ledger().balance_of(&alice), LAMPORTS_PER_SOL);

    // balance (already reconciled by the airdrop)
    let name = manager
        .select_wallet(&SelectionCriterion::Interactive, &mut operator)
        .expect("alice should be selected");
    assert_eq!(
        manager.refresh_balance(&name, &mut operator),
        ReconcileOutcome::Unchanged {
            balance: LAMPORTS_PER_SOL
        }
    );

    // transfer <bob> 0.1
    let bob = Keypair::generate().address();
    let name = manager
        .select_wallet(&SelectionCriterion::Interactive, &mut operator)
        .expect("alice should be selected");
    let request = TransferRequest {
        recipient: bob.to_base58(),
        lamports: LAMPORTS_PER_SOL / 10,
    };
    let report = manager
        .transfer(&name, &request, &mut operator)
        .expect("Transfer should run");
    assert!(report.is_completed());

    let expected = LAMPORTS_PER_SOL - LAMPORTS_PER_SOL / 10 - 5_000;
    assert_eq!(manager.ledger().balance_of(&bob), LAMPORTS_PER_SOL / 10);
    assert_eq!(env.open_store().get("alice").map(|r| r.balance()), Some(expected));
    assert_eq!(operator.remaining_answers(), 0);
}

#[test]
fn test_airdrop_uses_configured_ceiling() {
    let env = TestWalletsEnv::new();
    let mut manager = manager(&env);
    manager.create_wallet("alice").expect("Failed to create wallet");
    let ceiling = manager.config().airdrop.max_lamports;
    let mut operator = ScriptedOperator::silent();

    let report = manager
        .airdrop("alice", Some(ceiling * 2), &mut operator)
        .expect("Airdrop should run");

    assert_eq!(report.granted, ceiling);
    assert_eq!(manager.ledger().faucet_requests(), vec![ceiling]);
    assert_eq!(operator.warnings().len(), 1);
}

#[test]
fn test_select_wallet_by_name() {
    let env = TestWalletsEnv::new();
    let mut manager = manager(&env);
    manager.create_wallet("alice").expect("Failed to create wallet");
    manager.create_wallet("bob").expect("Failed to create wallet");
    let mut operator = ScriptedOperator::silent();

    assert_eq!(
        manager.select_wallet(&SelectionCriterion::ByName("bob".to_string()), &mut operator),
        Some("bob".to_string())
    );
    assert_eq!(
        manager.select_wallet(&SelectionCriterion::ByName("carol".to_string()), &mut operator),
        None
    );
}
