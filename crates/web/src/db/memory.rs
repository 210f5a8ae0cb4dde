//! In-process document store.
//!
//! Used when no database URL is configured, and by tests. All collections sit
//! behind one `RwLock`; each trait call takes the lock once, so single calls
//! are atomic but sequences of calls are not.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use recipe_book_core::{RecipeId, ReviewId, UserId};

use super::{RecipeStore, RepositoryError, ReviewStore, UserStore};
use crate::models::{NewRecipe, NewReview, NewUser, Recipe, Review, User};

#[derive(Debug, Default)]
struct Collections {
    /// Kept in insertion order.
    recipes: Vec<Recipe>,
    reviews: HashMap<ReviewId, Review>,
    users: Vec<User>,
}

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn len_to_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        Ok(self.inner.read().await.recipes.clone())
    }

    async fn count_recipes(&self) -> Result<u64, RepositoryError> {
        Ok(len_to_u64(self.inner.read().await.recipes.len()))
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError> {
        let recipe = recipe.into_recipe();
        self.inner.write().await.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let mut inner = self.inner.write().await;
        let position = inner.recipes.iter().position(|r| r.id == id);
        Ok(position.map(|index| inner.recipes.remove(index)))
    }

    async fn push_comment(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Some(recipe) = inner.recipes.iter_mut().find(|r| r.id == recipe_id) else {
            return Ok(false);
        };
        recipe.comments.push(review_id);
        Ok(true)
    }

    async fn pull_comment(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let Some(recipe) = inner.recipes.iter_mut().find(|r| r.id == recipe_id) else {
            return Ok(false);
        };
        recipe.comments.retain(|id| *id != review_id);
        Ok(true)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_review(&self, review: NewReview) -> Result<Review, RepositoryError> {
        let review = review.into_review();
        self.inner
            .write()
            .await
            .reviews
            .insert(review.id, review.clone());
        Ok(review)
    }

    async fn get_reviews(&self, ids: &[ReviewId]) -> Result<Vec<Review>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.reviews.get(id).cloned())
            .collect())
    }

    async fn delete_review(&self, id: ReviewId) -> Result<bool, RepositoryError> {
        Ok(self.inner.write().await.reviews.remove(&id).is_some())
    }

    async fn delete_reviews(&self, ids: &[ReviewId]) -> Result<u64, RepositoryError> {
        let mut inner = self.inner.write().await;
        let removed = ids
            .iter()
            .filter(|id| inner.reviews.remove(*id).is_some())
            .count();
        Ok(len_to_u64(removed))
    }

    async fn count_reviews(&self) -> Result<u64, RepositoryError> {
        Ok(len_to_u64(self.inner.read().await.reviews.len()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let user = User {
            id: UserId::generate(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }
}
