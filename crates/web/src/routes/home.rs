//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Recipe};
use crate::services::RecipeService;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub recipes: Vec<Recipe>,
}

/// Display the home page with every recipe.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<HomeTemplate> {
    let recipes = RecipeService::new(state.store()).list().await?;
    Ok(HomeTemplate { user, recipes })
}

/// Calculator placeholder.
pub async fn calculator() -> &'static str {
    "Calculator coming soon"
}
