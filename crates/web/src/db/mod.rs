//! Document store for Recipe Book.
//!
//! # Collections
//!
//! - `recipe` - Recipes, each carrying an ordered `comments` list of review IDs
//! - `review` - Reviews, referenced from exactly one recipe
//! - `app_user` - Registered accounts (username is unique)
//! - `tower_sessions.session` - Tower-sessions storage (`PostgreSQL` backend only)
//!
//! # Backends
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx, used whenever a database URL is configured
//! - [`MemoryStore`] - in-process collections for local development and tests
//!
//! Multi-step operations (append a review, remove a review, cascade delete)
//! are composed from single-document calls; the store offers no transactions
//! across them.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p recipe-book-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use recipe_book_core::{RecipeId, ReviewId, UserId};

use crate::models::{NewRecipe, NewReview, NewUser, Recipe, Review, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Recipe collection operations.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes in insertion order.
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError>;

    /// Number of stored recipes.
    async fn count_recipes(&self) -> Result<u64, RepositoryError>;

    /// Fetch a single recipe.
    async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError>;

    /// Insert a new recipe with an empty comment list.
    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError>;

    /// Delete a recipe and return the removed document, if any.
    ///
    /// This does NOT touch the referenced reviews; callers run the cascade.
    async fn delete_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError>;

    /// Append a review reference to the end of a recipe's comment list.
    ///
    /// Returns `false` if the recipe does not exist.
    async fn push_comment(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<bool, RepositoryError>;

    /// Remove every occurrence of a review reference from a recipe.
    ///
    /// Returns `false` if the recipe does not exist.
    async fn pull_comment(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<bool, RepositoryError>;
}

/// Review collection operations.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert a new review.
    async fn insert_review(&self, review: NewReview) -> Result<Review, RepositoryError>;

    /// Fetch reviews by ID, in the order given. Missing IDs are skipped.
    async fn get_reviews(&self, ids: &[ReviewId]) -> Result<Vec<Review>, RepositoryError>;

    /// Delete one review. Returns `true` if it existed.
    async fn delete_review(&self, id: ReviewId) -> Result<bool, RepositoryError>;

    /// Delete many reviews. Returns the number removed.
    async fn delete_reviews(&self, ids: &[ReviewId]) -> Result<u64, RepositoryError>;

    /// Number of stored reviews.
    async fn count_reviews(&self) -> Result<u64, RepositoryError>;
}

/// User collection operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Fetch a user by ID.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by username.
    async fn find_user_by_username(&self, username: &str)
    -> Result<Option<User>, RepositoryError>;
}

/// The full document store: every collection behind one handle.
pub trait Store: RecipeStore + ReviewStore + UserStore {}

impl<T: RecipeStore + ReviewStore + UserStore> Store for T {}

/// Shared, type-erased store handle.
pub type SharedStore = Arc<dyn Store>;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
