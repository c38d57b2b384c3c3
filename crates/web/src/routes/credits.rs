//! Credit purchase route handlers.
//!
//! The purchase flow has three stages with different guarantees:
//!
//! 1. Gateway customer provisioning (find-or-create) - outside any
//!    transaction; a newly minted customer id is persisted on the user.
//! 2. The charge - the gateway is the source of truth once this succeeds.
//! 3. `apply_purchase` - one atomic transaction recording the purchase and
//!    crediting the balance.
//!
//! If stage 3 fails after stage 2 succeeded there is no automatic reversal;
//! the charge id is logged at `error!` for manual reconciliation
//! (`digitdraw-cli grant`).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use digitdraw_core::Credits;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::routes::auth::MessageQuery;
use crate::services::credits::{self, CreditEngine};
use crate::state::AppState;

/// Description attached to gateway charges.
const CHARGE_DESCRIPTION: &str = "Random digit credits";

/// Purchase form data.
///
/// The camelCase field names are what Stripe's checkout form posts.
#[derive(Debug, Deserialize)]
pub struct BuyCreditsForm {
    pub credits: u32,
    #[serde(rename = "stripeEmail")]
    pub stripe_email: String,
    #[serde(rename = "stripeToken")]
    pub stripe_token: String,
}

/// Purchase page template.
#[derive(Template, WebTemplate)]
#[template(path = "credits/buy.html")]
pub struct BuyCreditsTemplate {
    pub publishable_key: String,
    pub balance: Credits,
    pub error: Option<String>,
}

/// Display the purchase page.
pub async fn buy_page(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    Ok(BuyCreditsTemplate {
        publishable_key: state.config().stripe.publishable_key.clone(),
        balance: user.balance,
        error: query.error,
    })
}

/// Handle the purchase form: charge the gateway, then credit the balance.
pub async fn buy(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<BuyCreditsForm>,
) -> Result<Response> {
    if form.credits == 0 {
        return Err(AppError::BadRequest(
            "credit amount must be positive".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool());
    let user = users
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    // Provision the gateway customer. Not covered by the purchase
    // transaction: a customer can exist without a purchase.
    let (customer, newly_created) = state
        .stripe()
        .find_or_create_customer(
            user.stripe_customer_id.as_deref(),
            &form.stripe_email,
            &form.stripe_token,
        )
        .await
        .map_err(|e| {
            tracing::warn!(email = %user.email, error = %e, "Error creating Stripe customer");
            AppError::Gateway(e)
        })?;

    if newly_created {
        users.set_stripe_customer(user.id, &customer.id).await?;
    }

    let amount = credits::charge_amount(form.credits);

    let confirmation = state
        .stripe()
        .create_charge(&customer.id, amount, CHARGE_DESCRIPTION)
        .await
        .map_err(|e| {
            tracing::warn!(email = %user.email, error = %e, "Error creating Stripe charge");
            AppError::Gateway(e)
        })?;

    let engine = CreditEngine::new(state.pool());
    match engine.apply_purchase(user.id, &confirmation).await {
        Ok(purchase) => {
            tracing::info!(
                user_id = %user.id,
                charge_id = %purchase.charge_id,
                amount = %purchase.amount,
                "Credits purchased"
            );
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) => {
            // The charge went through but the grant didn't: the user is now
            // under-credited relative to a real charge, and nothing reverses
            // that automatically. Log everything needed for a manual grant.
            tracing::error!(
                user_id = %user.id,
                charge_id = %confirmation.charge_id,
                amount = %confirmation.amount,
                error = %e,
                "Charge succeeded but crediting failed; reconcile with digitdraw-cli grant"
            );
            Err(AppError::Credit(e))
        }
    }
}
