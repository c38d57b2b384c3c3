//! Credit engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur inside the credit engine.
///
/// Insufficient balance is not represented here: it is a normal outcome of
/// a draw, returned as [`super::Draw::InsufficientBalance`].
#[derive(Debug, Error)]
pub enum CreditError {
    /// The atomic transaction failed to commit. No partial effects remain
    /// locally, but for a purchase the gateway charge has already happened;
    /// callers must log the charge id so the grant can be reconciled by hand.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A charged amount that doesn't convert to a whole credit grant.
    #[error("charged amount {0} does not map to a credit grant")]
    InvalidAmount(Decimal),
}
