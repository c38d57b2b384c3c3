//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile with balance and purchase history
//!
//! # Credits (requires auth)
//! GET  /credits/buy            - Purchase page
//! POST /credits/buy            - Charge the gateway and credit the balance
//!
//! # API (requires auth)
//! GET  /api/v1/number          - Spend a credit, generate a digit
//! ```

pub mod account;
pub mod auth;
pub mod credits;
pub mod home;
pub mod numbers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/", get(account::profile))
}

/// Create the credit purchase routes router.
pub fn credit_routes() -> Router<AppState> {
    Router::new().route("/buy", get(credits::buy_page).post(credits::buy))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/number", get(numbers::draw))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Auth routes
        .nest("/auth", auth_routes())
        // Account routes
        .nest("/account", account_routes())
        // Credit purchase routes
        .nest("/credits", credit_routes())
        // JSON API
        .nest("/api/v1", api_routes())
}
