//! Purchase domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use digitdraw_core::{PurchaseId, UserId};

/// A credit purchase mapped to a gateway charge.
///
/// Immutable once created: exactly one row exists per successful charge,
/// and nothing updates or deletes it.
#[derive(Debug, Clone)]
pub struct Purchase {
    /// Database ID of this purchase.
    pub id: PurchaseId,
    /// Gateway charge reference.
    pub charge_id: String,
    /// Gateway customer reference that paid the charge.
    pub payer_id: String,
    /// Service package label.
    pub package: String,
    /// Monetary amount in dollars.
    pub amount: Decimal,
    /// When the purchase was recorded.
    pub created_at: DateTime<Utc>,
    /// User who owns this purchase.
    pub user_id: UserId,
}
