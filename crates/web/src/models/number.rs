//! Generated number domain type.

use chrono::{DateTime, Utc};

use digitdraw_core::{NumberId, UserId};

/// A digit a user has generated.
///
/// Immutable once created. Creation is coupled to the credit debit: a row
/// exists if and only if a credit was spent for it.
#[derive(Debug, Clone)]
pub struct GeneratedNumber {
    /// Database ID of this draw.
    pub id: NumberId,
    /// The generated digit.
    pub value: i32,
    /// When the digit was drawn.
    pub created_at: DateTime<Utc>,
    /// User who owns this draw.
    pub user_id: UserId,
}
