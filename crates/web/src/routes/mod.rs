//! HTTP route handlers for the recipe site.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                  - Home page (recipe list)
//! GET    /calculator                        - Placeholder
//! GET    /health                            - Liveness check
//! GET    /health/ready                      - Readiness check
//!
//! # Recipes
//! GET    /recipes                           - Recipe listing
//! POST   /recipes                           - Create recipe
//! GET    /recipes/new                       - Creation form
//! GET    /recipes/{id}                      - Recipe detail with reviews
//! DELETE /recipes/{id}                      - Delete recipe (cascades to reviews)
//!
//! # Reviews
//! POST   /recipes/{id}/review               - Add review
//! DELETE /recipes/{id}/reviews/{comment_id} - Remove review
//!
//! # Accounts
//! GET    /accounts                          - Redirect by session
//! GET    /accounts/register                 - Register page
//! POST   /accounts/register                 - Register action
//! GET    /accounts/login                    - Login page
//! POST   /accounts/login                    - Login action
//! GET    /accounts/noAccount                - Anonymous account page
//! GET    /accounts/{id}                     - Account page (requires auth)
//! POST   /logout                            - Logout action
//! ```
//!
//! `DELETE` routes are reached from HTML forms through `POST ?_method=DELETE`
//! (see [`crate::middleware::method_override`]).

pub mod accounts;
pub mod health;
pub mod home;
pub mod recipes;
pub mod reviews;

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the recipe and review routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::index).post(recipes::create))
        .route("/new", get(recipes::new))
        .route("/{id}", get(recipes::show).delete(recipes::delete))
        .route("/{id}/review", post(reviews::create))
        .route("/{id}/reviews/{comment_id}", delete(reviews::delete))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(accounts::index))
        .route(
            "/register",
            get(accounts::register_page).post(accounts::register),
        )
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/noAccount", get(accounts::no_account))
        .route("/{id}", get(accounts::show))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/calculator", get(home::calculator))
        // Probes
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Recipe and review routes
        .nest("/recipes", recipe_routes())
        // Account routes
        .nest("/accounts", account_routes())
        .route("/logout", post(accounts::logout))
        .fallback(not_found)
}

/// Fallback for unmatched paths.
async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Page not found")
}
