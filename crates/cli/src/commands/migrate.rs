//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rb-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `RECIPE_BOOK_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Collection migrations live in `crates/web/migrations/`. The session table
//! is created by `tower-sessions-sqlx-store` in its own `tower_sessions`
//! schema.

use tower_sessions_sqlx_store::PostgresStore;

use recipe_book_web::db;

use super::{CommandError, database_url};

/// Run every migration against the configured database.
///
/// # Errors
///
/// Returns an error if the URL is missing, the database is unreachable, or a
/// migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running collection migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool.clone()).migrate().await?;

    pool.close().await;
    tracing::info!("Migrations complete!");
    Ok(())
}
