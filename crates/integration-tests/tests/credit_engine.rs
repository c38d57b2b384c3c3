//! Ledger invariant tests run straight against `PostgreSQL`.
//!
//! These tests require a database with migrations applied:
//!
//! ```bash
//! DIGITDRAW_TEST_DATABASE_URL=postgres://... \
//!     cargo test -p digitdraw-integration-tests -- --ignored
//! ```

use rust_decimal::Decimal;
use sqlx::PgPool;

use digitdraw_core::UserId;
use digitdraw_integration_tests::{test_pool, unique_email};
use digitdraw_web::services::auth::{AuthError, AuthService};
use digitdraw_web::services::credits::{CreditEngine, Draw};
use digitdraw_web::services::stripe::ChargeConfirmation;

/// Insert a user directly with the given balance.
async fn create_user(pool: &PgPool, balance: i32) -> UserId {
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO app_user (email, password_hash, balance) VALUES ($1, 'test-hash', $2) RETURNING id",
    )
    .bind(unique_email("engine"))
    .bind(balance)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user");
    UserId::new(id)
}

async fn balance_of(pool: &PgPool, user_id: UserId) -> i32 {
    sqlx::query_scalar("SELECT balance FROM app_user WHERE id = $1")
        .bind(user_id.as_i32())
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

async fn numbers_owned_by(pool: &PgPool, user_id: UserId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM generated_number WHERE user_id = $1")
        .bind(user_id.as_i32())
        .fetch_one(pool)
        .await
        .expect("Failed to count numbers")
}

// ============================================================================
// Draw Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_zero_balance_draw_mutates_nothing() {
    let pool = test_pool().await;
    let user_id = create_user(&pool, 0).await;
    let engine = CreditEngine::new(&pool);

    let draw = engine.draw_number(user_id).await.expect("draw failed");

    assert!(matches!(draw, Draw::InsufficientBalance));
    assert_eq!(balance_of(&pool, user_id).await, 0);
    assert_eq!(numbers_owned_by(&pool, user_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_draw_debits_once_and_records() {
    let pool = test_pool().await;
    let user_id = create_user(&pool, 3).await;
    let engine = CreditEngine::new(&pool);

    let draw = engine.draw_number(user_id).await.expect("draw failed");

    let Draw::Generated { number, remaining } = draw else {
        panic!("expected a successful draw");
    };
    assert!((0..9).contains(&number.value));
    assert_eq!(number.user_id, user_id);
    assert_eq!(remaining.as_i32(), 2);
    assert_eq!(balance_of(&pool, user_id).await, 2);
    assert_eq!(numbers_owned_by(&pool, user_id).await, 1);
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_concurrent_draws_spend_single_credit_once() {
    let pool = test_pool().await;
    let user_id = create_user(&pool, 1).await;

    let engine_a = CreditEngine::new(&pool);
    let engine_b = CreditEngine::new(&pool);

    let (a, b) = tokio::join!(engine_a.draw_number(user_id), engine_b.draw_number(user_id));
    let a = a.expect("first draw errored");
    let b = b.expect("second draw errored");

    let successes = [&a, &b]
        .iter()
        .filter(|d| matches!(d, Draw::Generated { .. }))
        .count();

    assert_eq!(successes, 1, "exactly one draw should win the last credit");
    assert_eq!(balance_of(&pool, user_id).await, 0);
    assert_eq!(numbers_owned_by(&pool, user_id).await, 1);
}

// ============================================================================
// Purchase Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_purchase_credits_balance_and_records() {
    let pool = test_pool().await;
    let user_id = create_user(&pool, 3).await;
    let engine = CreditEngine::new(&pool);

    let confirmation = ChargeConfirmation {
        charge_id: "ch_test_123".to_string(),
        customer_id: "cus_test_123".to_string(),
        amount: Decimal::from(5),
    };

    let purchase = engine
        .apply_purchase(user_id, &confirmation)
        .await
        .expect("purchase failed");

    assert_eq!(purchase.charge_id, "ch_test_123");
    assert_eq!(purchase.payer_id, "cus_test_123");
    assert_eq!(purchase.package, "credits");
    assert_eq!(purchase.amount, Decimal::from(5));
    assert_eq!(purchase.user_id, user_id);

    assert_eq!(balance_of(&pool, user_id).await, 8);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase WHERE user_id = $1")
        .bind(user_id.as_i32())
        .fetch_one(&pool)
        .await
        .expect("Failed to count purchases");
    assert_eq!(count, 1);
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_registration_grants_starter_credits() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);
    let email = unique_email("register");

    let user = auth
        .register(&email, "a perfectly fine password")
        .await
        .expect("registration failed");

    assert_eq!(user.balance.as_i32(), 3);
    assert_eq!(user.email.as_str(), email);
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_registration_rejects_duplicate_email() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);
    let email = unique_email("duplicate");

    auth.register(&email, "a perfectly fine password")
        .await
        .expect("first registration failed");

    let second = auth.register(&email, "another fine password").await;
    assert!(matches!(second, Err(AuthError::UserAlreadyExists)));
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_login_wrong_password_fails() {
    let pool = test_pool().await;
    let auth = AuthService::new(&pool);
    let email = unique_email("login");

    auth.register(&email, "the right password")
        .await
        .expect("registration failed");

    let result = auth.login(&email, "the wrong password").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));

    // An unknown user fails the same way
    let result = auth.login(&unique_email("ghost"), "whatever").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}
