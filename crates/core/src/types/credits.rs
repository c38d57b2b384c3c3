//! Credit balance type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's credit balance.
///
/// One credit buys one digit draw. Balances are stored as `INTEGER` in the
/// database (with a `CHECK (balance >= 0)` constraint); this wrapper keeps
/// balances from being mixed up with other integer quantities in the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Credits(i32);

impl Credits {
    /// An empty balance.
    pub const ZERO: Self = Self(0);

    /// Create a balance from an i32 value.
    #[must_use]
    pub const fn new(amount: i32) -> Self {
        Self(amount)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Whether at least one credit is available to spend.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Credits {
    fn from(amount: i32) -> Self {
        Self(amount)
    }
}

impl From<Credits> for i32 {
    fn from(credits: Credits) -> Self {
        credits.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Credits {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Credits {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Credits {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_positive() {
        assert!(Credits::new(1).is_positive());
        assert!(!Credits::ZERO.is_positive());
        assert!(!Credits::new(-1).is_positive());
    }

    #[test]
    fn test_serde_transparent() {
        let credits = Credits::new(3);
        let json = serde_json::to_string(&credits).unwrap();
        assert_eq!(json, "3");

        let parsed: Credits = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, credits);
    }

    #[test]
    fn test_display() {
        assert_eq!(Credits::new(8).to_string(), "8");
    }
}
