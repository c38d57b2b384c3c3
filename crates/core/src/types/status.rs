//! Status enums shared across components.

use serde::{Deserialize, Serialize};

/// Outcome of a digit draw, as reported to API clients.
///
/// `Failure` means the caller had no credits to spend. It is a normal
/// outcome, not an error: the request succeeds with HTTP 200 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawStatus {
    Success,
    Failure,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&DrawStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(
            serde_json::to_string(&DrawStatus::Failure).unwrap(),
            "\"FAILURE\""
        );
    }

    #[test]
    fn test_roundtrip() {
        let status: DrawStatus = serde_json::from_str("\"FAILURE\"").unwrap();
        assert_eq!(status, DrawStatus::Failure);
    }
}
