//! `PostgreSQL` document store.
//!
//! Each collection is a table keyed by UUID. A recipe's review references
//! live in a `UUID[]` column so that appends and removals are single-row
//! updates (`array_append` / `array_remove`).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use recipe_book_core::{Rating, RecipeId, ReviewId, UserId, to_uuids};

use super::{RecipeStore, RepositoryError, ReviewStore, UserStore};
use crate::models::{NewRecipe, NewReview, NewUser, Recipe, Review, User};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for recipe queries.
#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: Uuid,
    title: String,
    image: Option<String>,
    author: Option<String>,
    description: Option<String>,
    steps: Option<String>,
    comments: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: RecipeId::new(row.id),
            title: row.title,
            image: row.image,
            author: row.author,
            description: row.description,
            steps: row.steps,
            comments: row.comments.into_iter().map(ReviewId::new).collect(),
            created_at: row.created_at,
        }
    }
}

/// Internal row type for review queries.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    rating: Option<f64>,
    body: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = row
            .rating
            .map(Rating::new)
            .transpose()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid rating: {e}")))?;

        Ok(Self {
            id: ReviewId::new(row.id),
            rating,
            body: row.body,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

const RECIPE_COLUMNS: &str =
    "id, title, image, author, description, steps, comments, created_at";
const REVIEW_COLUMNS: &str = "id, rating, body, created_at";
const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

fn count_to_u64(count: i64) -> Result<u64, RepositoryError> {
    u64::try_from(count)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative count: {count}")))
}

// =============================================================================
// Store
// =============================================================================

/// Document store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipe ORDER BY seq ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    async fn count_recipes(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe")
            .fetch_one(&self.pool)
            .await?;
        count_to_u64(count)
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipe WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Recipe::from))
    }

    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError> {
        let recipe = recipe.into_recipe();
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            r"
            INSERT INTO recipe (id, title, image, author, description, steps, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {RECIPE_COLUMNS}
            "
        ))
        .bind(recipe.id)
        .bind(&recipe.title)
        .bind(&recipe.image)
        .bind(&recipe.author)
        .bind(&recipe.description)
        .bind(&recipe.steps)
        .bind(recipe.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "DELETE FROM recipe WHERE id = $1 RETURNING {RECIPE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Recipe::from))
    }

    async fn push_comment(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE recipe SET comments = array_append(comments, $2) WHERE id = $1")
                .bind(recipe_id)
                .bind(review_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn pull_comment(
        &self,
        recipe_id: RecipeId,
        review_id: ReviewId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE recipe SET comments = array_remove(comments, $2) WHERE id = $1")
                .bind(recipe_id)
                .bind(review_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn insert_review(&self, review: NewReview) -> Result<Review, RepositoryError> {
        let review = review.into_review();
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r"
            INSERT INTO review (id, rating, body, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {REVIEW_COLUMNS}
            "
        ))
        .bind(review.id)
        .bind(review.rating.map(|r| r.value()))
        .bind(&review.body)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_reviews(&self, ids: &[ReviewId]) -> Result<Vec<Review>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM review WHERE id = ANY($1)"
        ))
        .bind(to_uuids(ids))
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<ReviewId, Review> = HashMap::with_capacity(rows.len());
        for row in rows {
            let review = Review::try_from(row)?;
            by_id.insert(review.id, review);
        }

        // Keep the caller's ordering; `ANY` returns rows in arbitrary order.
        Ok(ids.iter().filter_map(|id| by_id.get(id).cloned()).collect())
    }

    async fn delete_review(&self, id: ReviewId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM review WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_reviews(&self, ids: &[ReviewId]) -> Result<u64, RepositoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM review WHERE id = ANY($1)")
            .bind(to_uuids(ids))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_reviews(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review")
            .fetch_one(&self.pool)
            .await?;
        count_to_u64(count)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO app_user (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(UserId::generate())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}
