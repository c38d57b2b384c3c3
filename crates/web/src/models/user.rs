//! User domain type.

use chrono::{DateTime, Utc};

use digitdraw_core::{Credits, Email, UserId};

/// A registered user.
///
/// The password hash never appears here; it stays inside the repository
/// layer and is only surfaced to the authentication service for
/// verification.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Spendable credit balance. Mutated only by the credit engine.
    pub balance: Credits,
    /// Stripe customer reference, set on first purchase.
    pub stripe_customer_id: Option<String>,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}
