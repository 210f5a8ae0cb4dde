//! Document models for Recipe Book.
//!
//! Three collections are persisted:
//!
//! - `recipe` - recipes with an ordered list of review references
//! - `review` - standalone review documents (referenced by exactly one recipe)
//! - `user` - registered accounts

pub mod recipe;
pub mod session;
pub mod user;

pub use recipe::{NewRecipe, NewReview, Recipe, RecipeWithReviews, Review};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
