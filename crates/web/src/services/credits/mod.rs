//! Credit engine.
//!
//! The only component that mutates balances. Two operations, each a single
//! atomic transaction against the store:
//!
//! - [`CreditEngine::draw_number`] - spend one credit to generate a digit,
//!   with the debit and the `generated_number` insert committing together.
//! - [`CreditEngine::apply_purchase`] - record a confirmed gateway charge
//!   and credit the balance, with the `purchase` insert and the increment
//!   committing together.

mod error;

pub use error::CreditError;

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;

use digitdraw_core::{Credits, UserId};

use crate::db::numbers::NumberRow;
use crate::db::purchases::PurchaseRow;
use crate::models::{GeneratedNumber, Purchase};
use crate::services::stripe::ChargeConfirmation;

/// Price of one credit, in whole dollars.
///
/// Grants are derived from the dollars charged at this same rate (see
/// [`credits_granted`]), so changing the price changes the grant semantics
/// with it; the two are coupled on purpose and kept in this one module.
const DOLLARS_PER_CREDIT: i64 = 1;

/// Half-open range digits are sampled from: 0 through 8. The upper bound is
/// exclusive, so 9 itself never occurs.
const DIGIT_RANGE: std::ops::Range<i32> = 0..9;

/// Package label recorded on credit purchases.
const PACKAGE_CREDITS: &str = "credits";

/// Outcome of a draw.
#[derive(Debug)]
pub enum Draw {
    /// A credit was spent and a digit generated.
    Generated {
        /// The persisted draw.
        number: GeneratedNumber,
        /// Balance remaining after the debit.
        remaining: Credits,
    },
    /// The balance was not strictly positive; nothing was mutated.
    ///
    /// A normal outcome, not an error.
    InsufficientBalance,
}

/// The credit engine.
///
/// Constructed explicitly with a pool handle; operations take the acting
/// user as a parameter rather than reading any ambient identity.
pub struct CreditEngine<'a> {
    pool: &'a PgPool,
}

impl<'a> CreditEngine<'a> {
    /// Create a new credit engine.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Spend one credit to generate a digit.
    ///
    /// The debit is a conditional decrement (`... AND balance > 0`), so
    /// concurrent draws against the same user serialize on the row lock:
    /// with one credit left, exactly one of two simultaneous calls
    /// succeeds and the balance never goes negative. The decrement and the
    /// `generated_number` insert commit as one transaction; if the insert
    /// fails the debit rolls back with it.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::Database` if the transaction fails. An
    /// insufficient balance is not an error; see [`Draw::InsufficientBalance`].
    pub async fn draw_number(&self, user_id: UserId) -> Result<Draw, CreditError> {
        let mut tx = self.pool.begin().await?;

        let remaining: Option<i32> = sqlx::query_scalar(
            r"
            UPDATE app_user
            SET balance = balance - 1
            WHERE id = $1 AND balance > 0
            RETURNING balance
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining) = remaining else {
            // No row matched: balance was zero. Dropping tx rolls back.
            return Ok(Draw::InsufficientBalance);
        };

        let value = draw_digit(&mut rand::rng());

        let row = sqlx::query_as::<_, NumberRow>(
            r"
            INSERT INTO generated_number (value, user_id)
            VALUES ($1, $2)
            RETURNING id, value, created_at, user_id
            ",
        )
        .bind(value)
        .bind(user_id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Draw::Generated {
            number: row.into(),
            remaining: Credits::new(remaining),
        })
    }

    /// Record a confirmed gateway charge and credit the balance.
    ///
    /// The precondition is that the charge already succeeded at the
    /// gateway; this method only reconciles it into the ledger. The
    /// `purchase` insert and the balance increment commit as one
    /// transaction.
    ///
    /// There is no compensating transaction: if this fails after the
    /// charge succeeded, the user is under-credited relative to a real
    /// charge. Callers log the charge id at `error!` so the grant can be
    /// applied manually (`digitdraw-cli grant`).
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidAmount` if the charged amount doesn't
    /// map to a whole credit grant, `CreditError::Database` if the
    /// transaction fails.
    pub async fn apply_purchase(
        &self,
        user_id: UserId,
        confirmation: &ChargeConfirmation,
    ) -> Result<Purchase, CreditError> {
        let granted = credits_granted(confirmation.amount)
            .ok_or(CreditError::InvalidAmount(confirmation.amount))?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PurchaseRow>(
            r"
            INSERT INTO purchase (charge_id, payer_id, package, amount, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, charge_id, payer_id, package, amount, created_at, user_id
            ",
        )
        .bind(&confirmation.charge_id)
        .bind(&confirmation.customer_id)
        .bind(PACKAGE_CREDITS)
        .bind(confirmation.amount)
        .bind(user_id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            UPDATE app_user
            SET balance = balance + $1
            WHERE id = $2
            ",
        )
        .bind(granted)
        .bind(user_id.as_i32())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}

/// Dollar amount to charge for a requested credit count.
#[must_use]
pub fn charge_amount(requested_credits: u32) -> Decimal {
    Decimal::from(requested_credits) * Decimal::from(DOLLARS_PER_CREDIT)
}

/// Credits granted for a charged dollar amount.
///
/// The grant tracks the dollars charged, not a separately validated credit
/// count; at the current one-dollar price the two are identical.
fn credits_granted(amount: Decimal) -> Option<i32> {
    (amount / Decimal::from(DOLLARS_PER_CREDIT)).trunc().to_i32()
}

/// Sample a digit uniformly from [`DIGIT_RANGE`].
fn draw_digit<R: Rng>(rng: &mut R) -> i32 {
    rng.random_range(DIGIT_RANGE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_draw_digit_in_range() {
        let mut rng = StdRng::seed_from_u64(0xD161_7D4A);
        for _ in 0..10_000 {
            let digit = draw_digit(&mut rng);
            assert!((0..9).contains(&digit), "digit {digit} out of range");
        }
    }

    #[test]
    fn test_draw_digit_never_nine() {
        // The upper bound is exclusive: 9 must not appear.
        let mut rng = StdRng::seed_from_u64(42);
        assert!((0..10_000).all(|_| draw_digit(&mut rng) != 9));
    }

    #[test]
    fn test_draw_digit_covers_whole_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 9];
        for _ in 0..10_000 {
            let digit = usize::try_from(draw_digit(&mut rng)).unwrap();
            seen[digit] = true;
        }
        assert!(seen.iter().all(|&s| s), "not all digits 0-8 were drawn");
    }

    #[test]
    fn test_charge_amount_one_dollar_per_credit() {
        assert_eq!(charge_amount(5), Decimal::from(5));
        assert_eq!(charge_amount(1), Decimal::from(1));
    }

    #[test]
    fn test_credits_granted_tracks_dollars() {
        assert_eq!(credits_granted(Decimal::from(5)), Some(5));
        assert_eq!(credits_granted(Decimal::from(0)), Some(0));
    }

    #[test]
    fn test_grant_matches_charge_roundtrip() {
        for credits in [1_u32, 3, 25, 100] {
            let amount = charge_amount(credits);
            assert_eq!(credits_granted(amount), Some(i32::try_from(credits).unwrap()));
        }
    }
}
