//! Seed the database with synthetic recipes.
//!
//! Not idempotent: every run appends another batch.

use tracing::info;

use recipe_book_web::db::{self, PgStore, RecipeStore};
use recipe_book_web::seed::seed_recipes;

use super::{CommandError, database_url};

/// Insert `count` synthetic recipes, then close the pool.
///
/// # Errors
///
/// Returns an error if the URL is missing, the database is unreachable, or an
/// insert fails.
pub async fn recipes(count: usize) -> Result<(), CommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgStore::new(pool.clone());
    let result = seed_and_count(&store, count).await;

    pool.close().await;

    let (inserted, total) = result?;
    info!(inserted, total, "Seed finished");
    Ok(())
}

async fn seed_and_count(store: &PgStore, count: usize) -> Result<(u64, u64), CommandError> {
    let inserted = seed_recipes(store, count).await?;
    let total = store.count_recipes().await?;
    Ok((inserted, total))
}
