//! Concurrent balance mutation tests
//!
//! Verify the compare-and-swap retry loop: concurrent mutations of the same
//! account must never lose an update or drive a balance negative.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledger_core::config::Config;
use ledger_core::{Error, LedgerContext, NewAccount};

/// Number of concurrent tasks for the contention tests
const TASK_COUNT: usize = 8;

/// Number of operations per task
const OPS_PER_TASK: usize = 5;

fn test_context() -> Arc<LedgerContext> {
    Arc::new(LedgerContext::in_memory(Config::default()).expect("failed to build context"))
}

async fn register(ctx: &LedgerContext, username: &str) -> String {
    ctx.accounts
        .register(NewAccount {
            username: username.to_string(),
            full_name: format!("{username} Example"),
            birth_place: "Springfield".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            gender: "female".to_string(),
            address: "12 Elm Street".to_string(),
            phone: format!("555-{username}"),
            email: format!("{username}@example.com"),
            password: "correct horse battery staple".to_string(),
        })
        .await
        .expect("registration failed")
        .account_number
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_deposits_lose_no_updates() {
    let ctx = test_context();
    register(&ctx, "alice").await;

    let mut handles = Vec::new();
    for _ in 0..TASK_COUNT {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            for _ in 0..OPS_PER_TASK {
                ctx.ledger
                    .deposit("alice", Decimal::from(10))
                    .await
                    .expect("deposit failed");
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let expected = Decimal::from((TASK_COUNT * OPS_PER_TASK * 10) as i64);
    assert_eq!(ctx.ledger.balance_of("alice").await.unwrap(), expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_withdrawals_never_overdraw() {
    let ctx = test_context();
    register(&ctx, "alice").await;
    ctx.ledger
        .deposit("alice", Decimal::from(100))
        .await
        .unwrap();

    // 8 tasks x 5 withdrawals of 10 = 400 requested against a balance of 100
    let mut handles = Vec::new();
    for _ in 0..TASK_COUNT {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            let mut succeeded = 0usize;
            for _ in 0..OPS_PER_TASK {
                match ctx.ledger.withdraw("alice", Decimal::from(10)).await {
                    Ok(_) => succeeded += 1,
                    Err(Error::InsufficientFunds { .. }) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
            succeeded
        }));
    }

    let mut total_succeeded = 0usize;
    for handle in handles {
        total_succeeded += handle.await.unwrap();
    }

    let final_balance = ctx.ledger.balance_of("alice").await.unwrap();
    assert!(final_balance >= Decimal::ZERO, "balance went negative");
    assert_eq!(total_succeeded, 10, "exactly the covered withdrawals succeed");
    assert_eq!(final_balance, Decimal::ZERO);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_transfers_conserve_the_total() {
    let ctx = test_context();
    let alice_number = register(&ctx, "alice").await;
    let bob_number = register(&ctx, "bob").await;
    ctx.ledger
        .deposit("alice", Decimal::from(500))
        .await
        .unwrap();
    ctx.ledger.deposit("bob", Decimal::from(500)).await.unwrap();

    let mut handles = Vec::new();
    for task in 0..TASK_COUNT {
        let ctx = Arc::clone(&ctx);
        let alice_number = alice_number.clone();
        let bob_number = bob_number.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..OPS_PER_TASK {
                // Half the tasks push one way, half the other
                let result = if task % 2 == 0 {
                    ctx.ledger
                        .transfer("alice", &bob_number, Decimal::from(5), "ping")
                        .await
                } else {
                    ctx.ledger
                        .transfer("bob", &alice_number, Decimal::from(5), "pong")
                        .await
                };
                match result {
                    Ok(_) | Err(Error::InsufficientFunds { .. }) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let total = ctx.ledger.balance_of("alice").await.unwrap()
        + ctx.ledger.balance_of("bob").await.unwrap();
    assert_eq!(total, Decimal::from(1000), "transfers must conserve the sum");
    assert!(ctx.ledger.balance_of("alice").await.unwrap() >= Decimal::ZERO);
    assert!(ctx.ledger.balance_of("bob").await.unwrap() >= Decimal::ZERO);
}
