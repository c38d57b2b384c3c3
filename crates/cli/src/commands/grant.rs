//! Manual credit grant command.
//!
//! The purchase flow has no compensating transaction: when a gateway
//! charge succeeds but the ledger write fails, the user ends up
//! under-credited relative to a real charge. This command is the manual
//! remedy. It applies the same atomic shape as the credit engine - one
//! transaction inserting a `purchase` row and incrementing the balance -
//! so reconciled grants stay auditable.
//!
//! # Usage
//!
//! ```bash
//! digitdraw-cli grant -e user@example.com -c 5 --charge-id ch_123
//! ```

use rust_decimal::Decimal;

use super::{CommandError, connect};

/// Package label recorded on manual grants, distinguishing them from
/// gateway-driven purchases.
const PACKAGE_MANUAL_GRANT: &str = "manual_grant";

/// Grant credits to a user.
///
/// # Errors
///
/// Returns `CommandError::UserNotFound` if no user has the given email,
/// or a database error if the transaction fails.
pub async fn run(email: &str, credits: u32, charge_id: Option<&str>) -> Result<(), CommandError> {
    let pool = connect().await?;

    let mut tx = pool.begin().await?;

    let user_id: Option<i32> = sqlx::query_scalar("SELECT id FROM app_user WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(user_id) = user_id else {
        return Err(CommandError::UserNotFound(email.to_owned()));
    };

    let amount = Decimal::from(credits);
    let charge_ref = charge_id.unwrap_or("manual");

    sqlx::query(
        r"
        INSERT INTO purchase (charge_id, payer_id, package, amount, user_id)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(charge_ref)
    .bind("support")
    .bind(PACKAGE_MANUAL_GRANT)
    .bind(amount)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let credits_i32 = i32::try_from(credits).unwrap_or(i32::MAX);
    sqlx::query("UPDATE app_user SET balance = balance + $1 WHERE id = $2")
        .bind(credits_i32)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(email, credits, charge_ref, "Credits granted");
    Ok(())
}
