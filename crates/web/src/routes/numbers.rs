//! Digit generation API route handler.

use axum::{Json, extract::State};
use serde::Serialize;

use digitdraw_core::DrawStatus;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::credits::{CreditEngine, Draw};
use crate::state::AppState;

/// JSON body returned by the draw endpoint.
///
/// On failure the `number` key is absent entirely, not null.
#[derive(Debug, Serialize)]
pub struct DrawResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    pub status: DrawStatus,
}

/// Spend one credit to generate a digit.
///
/// An empty balance is a normal outcome: the response is HTTP 200 with
/// `status: FAILURE` and no digit.
pub async fn draw(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<DrawResponse>> {
    let engine = CreditEngine::new(state.pool());

    let response = match engine.draw_number(current.id).await? {
        Draw::Generated { number, remaining } => {
            tracing::debug!(user_id = %current.id, remaining = %remaining, "Digit drawn");
            DrawResponse {
                number: Some(number.value),
                status: DrawStatus::Success,
            }
        }
        Draw::InsufficientBalance => DrawResponse {
            number: None,
            status: DrawStatus::Failure,
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_shape() {
        let response = DrawResponse {
            number: Some(4),
            status: DrawStatus::Success,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"number": 4, "status": "SUCCESS"}));
    }

    #[test]
    fn test_failure_body_omits_number() {
        let response = DrawResponse {
            number: None,
            status: DrawStatus::Failure,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"status": "FAILURE"}));
    }
}
