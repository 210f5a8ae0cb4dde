//! Review route handlers.
//!
//! Reviews are only reachable through their recipe; both handlers redirect
//! back to the recipe detail page.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use recipe_book_core::{RecipeId, ReviewId};

use crate::error::Result;
use crate::routes::recipes::not_found;
use crate::schemas::{ReviewForm, validate_review};
use crate::services::RecipeService;
use crate::state::AppState;

/// Handle review submission.
///
/// The recipe is looked up before the payload is validated, so a missing
/// recipe is a 404 even when the payload is also invalid.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect> {
    let service = RecipeService::new(state.store());
    let recipe = service.get(id).await.map_err(not_found)?;

    let review = validate_review(form).inspect_err(|e| {
        tracing::warn!(recipe_id = %id, error = %e, "review rejected");
    })?;

    service.add_review(&recipe, review).await.map_err(not_found)?;
    Ok(Redirect::to(&format!("/recipes/{id}")))
}

/// Remove a review from a recipe and delete it.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(RecipeId, ReviewId)>,
) -> Result<Redirect> {
    RecipeService::new(state.store())
        .remove_review(id, comment_id)
        .await?;
    Ok(Redirect::to(&format!("/recipes/{id}")))
}
