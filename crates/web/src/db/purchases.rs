//! Purchase repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use digitdraw_core::{PurchaseId, UserId};

use super::RepositoryError;
use crate::models::Purchase;

/// Internal row type for `PostgreSQL` purchase queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PurchaseRow {
    pub(crate) id: i32,
    pub(crate) charge_id: String,
    pub(crate) payer_id: String,
    pub(crate) package: String,
    pub(crate) amount: Decimal,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) user_id: i32,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: PurchaseId::new(row.id),
            charge_id: row.charge_id,
            payer_id: row.payer_id,
            package: row.package,
            amount: row.amount,
            created_at: row.created_at,
            user_id: UserId::new(row.user_id),
        }
    }
}

/// Repository for purchase database operations.
pub struct PurchaseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new purchase repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all purchases for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r"
            SELECT id, charge_id, payer_id, package, amount, created_at, user_id
            FROM purchase
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
