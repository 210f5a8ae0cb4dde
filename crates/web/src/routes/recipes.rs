//! Recipe route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use recipe_book_core::RecipeId;

use crate::db::RepositoryError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, Recipe, Review};
use crate::schemas::{RecipeForm, validate_recipe};
use crate::services::RecipeService;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Recipe listing template.
#[derive(Template, WebTemplate)]
#[template(path = "recipes/index.html")]
pub struct IndexTemplate {
    pub user: Option<CurrentUser>,
    pub recipes: Vec<Recipe>,
}

/// Recipe creation form template.
#[derive(Template, WebTemplate)]
#[template(path = "recipes/new.html")]
pub struct NewTemplate {
    pub user: Option<CurrentUser>,
}

/// Recipe detail template.
#[derive(Template, WebTemplate)]
#[template(path = "recipes/show.html")]
pub struct ShowTemplate {
    pub user: Option<CurrentUser>,
    pub recipe: Recipe,
    pub reviews: Vec<Review>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List every recipe in insertion order.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<IndexTemplate> {
    let recipes = RecipeService::new(state.store()).list().await?;
    Ok(IndexTemplate { user, recipes })
}

/// Display the recipe creation form.
pub async fn new(OptionalAuth(user): OptionalAuth) -> NewTemplate {
    NewTemplate { user }
}

/// Handle recipe creation.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<RecipeForm>,
) -> Result<Redirect> {
    let recipe = validate_recipe(form).inspect_err(|e| {
        tracing::warn!(error = %e, "recipe rejected");
    })?;

    RecipeService::new(state.store()).create(recipe).await?;
    Ok(Redirect::to("/recipes"))
}

/// Display one recipe with its reviews.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<RecipeId>,
) -> Result<ShowTemplate> {
    let shown = RecipeService::new(state.store())
        .show(id)
        .await
        .map_err(not_found)?;

    Ok(ShowTemplate {
        user,
        recipe: shown.recipe,
        reviews: shown.reviews,
    })
}

/// Delete a recipe and its reviews.
///
/// A missing recipe is not an error; the redirect happens either way.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<RecipeId>) -> Result<Redirect> {
    if RecipeService::new(state.store()).delete(id).await?.is_some() {
        let recipe_id = id.to_string();
        add_breadcrumb("recipes", "Deleted recipe", Some(&[("recipe_id", recipe_id.as_str())]));
    }
    Ok(Redirect::to("/recipes"))
}

/// Map a missing recipe to a 404 with a readable message.
pub(crate) fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("recipe not found".to_string()),
        other => AppError::Database(other),
    }
}
