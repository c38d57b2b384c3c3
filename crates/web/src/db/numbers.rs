//! Generated number repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use digitdraw_core::{NumberId, UserId};

use super::RepositoryError;
use crate::models::GeneratedNumber;

/// Internal row type for `PostgreSQL` generated number queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct NumberRow {
    pub(crate) id: i32,
    pub(crate) value: i32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) user_id: i32,
}

impl From<NumberRow> for GeneratedNumber {
    fn from(row: NumberRow) -> Self {
        Self {
            id: NumberId::new(row.id),
            value: row.value,
            created_at: row.created_at,
            user_id: UserId::new(row.user_id),
        }
    }
}

/// Repository for generated number database operations.
///
/// Inserts happen inside the credit engine's transaction, not here; this
/// repository only reads.
pub struct NumberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NumberRepository<'a> {
    /// Create a new number repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the most recent draws for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<GeneratedNumber>, RepositoryError> {
        let rows = sqlx::query_as::<_, NumberRow>(
            r"
            SELECT id, value, created_at, user_id
            FROM generated_number
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
