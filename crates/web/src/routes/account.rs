//! Account route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::db::{NumberRepository, PurchaseRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{GeneratedNumber, Purchase, User};
use crate::state::AppState;

/// How many recent draws the profile page shows.
const RECENT_DRAWS: i64 = 10;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub user: User,
    pub purchases: Vec<Purchase>,
    pub recent_numbers: Vec<GeneratedNumber>,
}

/// Display the profile page with balance and purchase history.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    let purchases = PurchaseRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    let recent_numbers = NumberRepository::new(state.pool())
        .list_recent_for_user(user.id, RECENT_DRAWS)
        .await?;

    Ok(ProfileTemplate {
        user,
        purchases,
        recent_numbers,
    })
}
