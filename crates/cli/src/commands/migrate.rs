//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! digitdraw-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DIGITDRAW_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/web/migrations/`.

use super::{CommandError, connect};

/// Run database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
