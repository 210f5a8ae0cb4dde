//! Recipe service.
//!
//! Composes single-document store calls into the recipe workflows. None of
//! the multi-step operations are transactional: a failure between steps can
//! leave a dangling review reference or an orphaned review.

use recipe_book_core::{RecipeId, ReviewId};

use crate::db::{RepositoryError, Store};
use crate::models::{NewRecipe, NewReview, Recipe, RecipeWithReviews, Review};

/// Recipe and review workflows.
pub struct RecipeService<'a> {
    store: &'a dyn Store,
}

impl<'a> RecipeService<'a> {
    /// Create a new recipe service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// All recipes in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails.
    pub async fn list(&self) -> Result<Vec<Recipe>, RepositoryError> {
        self.store.list_recipes().await
    }

    /// Insert a validated recipe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError> {
        let recipe = self.store.insert_recipe(recipe).await?;
        tracing::info!(recipe_id = %recipe.id, title = %recipe.title, "recipe created");
        Ok(recipe)
    }

    /// Fetch a recipe without resolving its reviews.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no recipe has this ID.
    pub async fn get(&self, id: RecipeId) -> Result<Recipe, RepositoryError> {
        self.store
            .get_recipe(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Fetch a recipe with its comment references resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no recipe has this ID.
    pub async fn show(&self, id: RecipeId) -> Result<RecipeWithReviews, RepositoryError> {
        let recipe = self.get(id).await?;
        let reviews = self.store.get_reviews(&recipe.comments).await?;

        if reviews.len() < recipe.comments.len() {
            tracing::warn!(
                recipe_id = %recipe.id,
                references = recipe.comments.len(),
                resolved = reviews.len(),
                "recipe has dangling review references"
            );
        }

        Ok(RecipeWithReviews { recipe, reviews })
    }

    /// Delete a recipe by ID and cascade to its reviews.
    ///
    /// Deleting a missing ID is not an error and deletes nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either delete fails. If the cascade fails
    /// the recipe is already gone and its reviews are orphaned.
    pub async fn delete(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let deleted = self.store.delete_recipe(id).await?;
        if let Some(recipe) = &deleted {
            self.after_delete(recipe).await?;
        }
        Ok(deleted)
    }

    /// Post-delete hook: remove every review the deleted recipe referenced.
    async fn after_delete(&self, recipe: &Recipe) -> Result<u64, RepositoryError> {
        let removed = self.store.delete_reviews(&recipe.comments).await?;
        tracing::info!(
            recipe_id = %recipe.id,
            reviews_removed = removed,
            "recipe deleted"
        );
        Ok(removed)
    }

    /// Create a review and append its reference to `recipe`.
    ///
    /// Two writes: the review insert, then the reference append.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe disappeared between
    /// the two writes (the review is left orphaned).
    pub async fn add_review(
        &self,
        recipe: &Recipe,
        review: NewReview,
    ) -> Result<Review, RepositoryError> {
        let review = self.store.insert_review(review).await?;
        if !self.store.push_comment(recipe.id, review.id).await? {
            tracing::warn!(
                recipe_id = %recipe.id,
                review_id = %review.id,
                "recipe vanished before review could be attached"
            );
            return Err(RepositoryError::NotFound);
        }

        tracing::info!(recipe_id = %recipe.id, review_id = %review.id, "review added");
        Ok(review)
    }

    /// Detach a review from a recipe and delete it.
    ///
    /// The two steps are independent and neither checks that the recipe or
    /// the review exists first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either store call fails.
    pub async fn remove_review(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<(), RepositoryError> {
        self.store.pull_comment(recipe_id, review_id).await?;
        self.store.delete_review(review_id).await?;
        tracing::info!(%recipe_id, %review_id, "review removed");
        Ok(())
    }
}
